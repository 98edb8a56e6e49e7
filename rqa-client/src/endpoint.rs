//! Hosted prediction endpoint adapter.
//!
//! Endpoints are addressed by the names configured in the `ml` section.
//! The payload goes out unchanged and the body comes back unchanged; the
//! scenario layer decides what `prediction` means for each model family.

use crate::http::{build_client, execute};
use reqwest::Client;
use rqa_core::{MlConfig, QaError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Client for hosted classification/regression endpoints.
#[derive(Debug)]
pub struct ModelEndpointClient {
    client: Client,
    endpoints: BTreeMap<String, String>,
}

impl ModelEndpointClient {
    /// Create a client from the `ml` config section.
    pub fn from_config(config: &MlConfig) -> Result<Self> {
        Ok(Self { client: build_client()?, endpoints: config.endpoints.clone() })
    }

    /// Names of the configured endpoints.
    pub fn endpoint_names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    /// Invoke a named endpoint and return the parsed response body.
    pub async fn invoke(&self, endpoint: &str, payload: &Value) -> Result<Value> {
        let url = self.endpoints.get(endpoint).ok_or_else(|| {
            QaError::Config(format!("unknown model endpoint `{}`", endpoint))
        })?;
        execute(self.client.post(url).json(payload), url).await
    }
}
