//! Chatbot adapter.
//!
//! The rebate chatbot is reachable two ways: through the deployed
//! serverless function, or directly through an OpenAI-compatible provider
//! when no function is deployed. Both backends take a query plus optional
//! context and return the response text unchanged.

use crate::http::{build_client, execute};
use reqwest::Client;
use rqa_core::{LlmConfig, Result};
use serde_json::{Value, json};

/// Default API base for the direct-provider backend.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Prompt template used by the direct-provider backend.
const PROMPT_TEMPLATE: &str = "Given the context: {context}\nAnswer the query: {query}";

#[derive(Debug)]
enum Backend {
    /// Serverless function accepting `{query, context}` and answering
    /// `{"response": "..."}`.
    Function { url: String, api_key: Option<String> },
    /// OpenAI-style `chat/completions` endpoint.
    Provider { api_base: String, model: String, api_key: String },
}

/// Client for the conversational chatbot.
#[derive(Debug)]
pub struct ChatbotClient {
    client: Client,
    backend: Backend,
}

impl ChatbotClient {
    /// Create a client that invokes a serverless function.
    pub fn for_function(url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            backend: Backend::Function { url: url.into(), api_key },
        })
    }

    /// Create a client that queries the LLM provider directly.
    pub fn for_provider(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_base =
            config.api_base.clone().unwrap_or_else(|| OPENAI_API_BASE.to_string());
        Ok(Self {
            client: build_client()?,
            backend: Backend::Provider {
                api_base,
                model: config.model.clone(),
                api_key: api_key.into(),
            },
        })
    }

    /// Build a chatbot client from the `llm` config section: the function
    /// backend when a URL is configured, the provider backend otherwise.
    pub fn from_config(config: &LlmConfig, api_key: &str) -> Result<Self> {
        match &config.function_url {
            Some(url) => Self::for_function(url.clone(), Some(api_key.to_string())),
            None => Self::for_provider(config, api_key),
        }
    }

    /// Send a query and return the chatbot's response text.
    pub async fn ask(&self, query: &str, context: Option<&str>) -> Result<String> {
        match &self.backend {
            Backend::Function { url, api_key } => {
                let payload = json!({
                    "query": query,
                    "context": context.unwrap_or(""),
                });
                let mut request = self.client.post(url).json(&payload);
                if let Some(key) = api_key {
                    request = request.bearer_auth(key);
                }
                let body = execute(request, url).await?;
                // A body without `response` reads as an empty answer; the
                // scenario's containment check fails it with a comparison
                // message instead of an adapter error.
                Ok(body
                    .get("response")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string())
            }
            Backend::Provider { api_base, model, api_key } => {
                let prompt = PROMPT_TEMPLATE
                    .replace("{context}", context.unwrap_or(""))
                    .replace("{query}", query);
                let url = format!("{}/chat/completions", api_base.trim_end_matches('/'));
                let payload = json!({
                    "model": model,
                    "messages": [{"role": "user", "content": prompt}],
                });
                let request = self.client.post(&url).bearer_auth(api_key).json(&payload);
                let body = execute(request, &url).await?;
                Ok(body["choices"][0]["message"]["content"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_picks_function_backend() {
        let config = LlmConfig {
            function_url: Some("https://fn.example.com/chatbot".to_string()),
            model: "gpt-3.5-turbo".to_string(),
            api_base: None,
            evaluation: Default::default(),
        };
        let client = ChatbotClient::from_config(&config, "sk-test").unwrap();
        assert!(matches!(client.backend, Backend::Function { .. }));
    }

    #[test]
    fn test_from_config_falls_back_to_provider() {
        let config = LlmConfig {
            function_url: None,
            model: "gpt-3.5-turbo".to_string(),
            api_base: Some("https://llm.example.com/v1/".to_string()),
            evaluation: Default::default(),
        };
        let client = ChatbotClient::from_config(&config, "sk-test").unwrap();
        match client.backend {
            Backend::Provider { api_base, model, .. } => {
                assert_eq!(api_base, "https://llm.example.com/v1/");
                assert_eq!(model, "gpt-3.5-turbo");
            }
            Backend::Function { .. } => panic!("expected provider backend"),
        }
    }
}
