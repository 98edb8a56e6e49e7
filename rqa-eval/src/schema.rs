//! Fixture schema definitions.
//!
//! One fixture file per test domain, each an ordered JSON array of
//! input/expected-output records. Fixtures are immutable for the run.

use crate::entities::EntitySpan;
use rqa_core::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// A chatbot query/expected-response pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmFixture {
    pub query: String,
    pub expected_response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A text/entities/intent triple for the NLP components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlpFixture {
    pub text: String,
    #[serde(default)]
    pub expected_entities: Vec<EntitySpan>,
    pub expected_intent: String,
}

/// A hosted-model input with its expected label or score.
///
/// `model` names the endpoint to invoke. Classification fixtures carry
/// `expected_label`, regression fixtures carry `expected_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlFixture {
    pub model: String,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_label: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_score: Option<f64>,
}

/// Load a fixture file: a JSON array of domain records.
pub fn load_fixtures<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let fixtures: Vec<T> = serde_json::from_str(&content)?;
    Ok(fixtures)
}

impl LlmFixture {
    /// Load an LLM fixture file.
    pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        load_fixtures(path)
    }
}

impl NlpFixture {
    /// Load an NLP fixture file.
    pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        load_fixtures(path)
    }
}

impl MlFixture {
    /// Load an ML fixture file.
    pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        load_fixtures(path)
    }
}
