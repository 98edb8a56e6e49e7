//! Shared HTTP plumbing for all adapters.
//!
//! This is the single error-translation boundary of the harness: request
//! failures become [`QaError::Transport`], non-success statuses become
//! [`QaError::Service`], and both are logged with the target before being
//! returned. There are no retries and no backoff; this is test
//! infrastructure and failures should be loud.

use reqwest::Client;
use rqa_core::{QaError, Result};
use serde_json::Value;

/// Build the shared HTTP client.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .build()
        .map_err(|e| QaError::Transport(format!("failed to create HTTP client: {}", e)))
}

/// Send a prepared request and parse the JSON body.
pub(crate) async fn execute(request: reqwest::RequestBuilder, target: &str) -> Result<Value> {
    let response = request.send().await.map_err(|e| {
        tracing::error!(target = target, error = %e, "request failed");
        QaError::Transport(format!("request to {} failed: {}", target, e))
    })?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        tracing::error!(target = target, status = status.as_u16(), "service error");
        return Err(QaError::Service { status: status.as_u16(), message });
    }

    response.json().await.map_err(|e| {
        tracing::error!(target = target, error = %e, "invalid JSON body");
        QaError::Transport(format!("invalid JSON body from {}: {}", target, e))
    })
}

/// Generic JSON-over-HTTP invoker for endpoints that don't warrant a
/// dedicated adapter (API gateway style calls).
pub struct HttpInvoker {
    client: Client,
}

impl HttpInvoker {
    /// Create a new invoker.
    pub fn new() -> Result<Self> {
        Ok(Self { client: build_client()? })
    }

    /// POST a JSON payload and return the parsed response body unchanged.
    pub async fn post(
        &self,
        url: &str,
        payload: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value> {
        let mut request = self.client.post(url).json(payload);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        execute(request, url).await
    }
}
