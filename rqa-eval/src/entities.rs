//! Entity extraction.
//!
//! The underlying NLP model is an external collaborator behind the
//! [`EntityModel`] trait. Whatever it proposes, [`extract_entities`] only
//! ever returns spans whose label is on the fixed medical whitelist.

use async_trait::async_trait;
use rqa_client::HttpInvoker;
use rqa_core::{EntityExtractionConfig, QaError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Entity label kinds the harness cares about. Spans with any other label
/// are dropped before scoring.
pub const ENTITY_LABEL_WHITELIST: [&str; 3] = ["DRUG", "SYMPTOM", "DIAGNOSIS"];

/// A labeled text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self { text: text.into(), label: label.into() }
    }
}

/// A model that proposes entity spans for a text.
#[async_trait]
pub trait EntityModel: Send + Sync {
    fn name(&self) -> &str;

    /// Propose spans for `text`. Labels are unconstrained here; filtering
    /// happens in [`extract_entities`].
    async fn propose(&self, text: &str) -> Result<Vec<EntitySpan>>;
}

/// Extract whitelisted entities from `text` using `model`.
pub async fn extract_entities(model: &dyn EntityModel, text: &str) -> Result<Vec<EntitySpan>> {
    let proposed = model.propose(text).await?;
    let entities: Vec<EntitySpan> = proposed
        .into_iter()
        .filter(|span| ENTITY_LABEL_WHITELIST.contains(&span.label.as_str()))
        .collect();
    tracing::debug!(model = model.name(), count = entities.len(), "extracted entities");
    Ok(entities)
}

/// Entity model hosted behind an HTTP endpoint.
///
/// Posts `{text, model}` and expects `{"entities": [{text, label}, ..]}`.
pub struct HostedEntityModel {
    invoker: HttpInvoker,
    url: String,
    model: String,
}

impl HostedEntityModel {
    /// Create a hosted model from the entity extraction config.
    pub fn from_config(config: &EntityExtractionConfig) -> Result<Self> {
        Ok(Self {
            invoker: HttpInvoker::new()?,
            url: config.endpoint_url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl EntityModel for HostedEntityModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn propose(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let payload = json!({ "text": text, "model": self.model });
        let body = self.invoker.post(&self.url, &payload, &[]).await?;
        let entities = body.get("entities").cloned().unwrap_or(Value::Null);
        serde_json::from_value(entities).map_err(|e| {
            QaError::Transport(format!("invalid entities body from {}: {}", self.url, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedModel(Vec<EntitySpan>);

    #[async_trait]
    impl EntityModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn propose(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_extraction_filters_to_whitelist() {
        let model = CannedModel(vec![
            EntitySpan::new("ibuprofen", "DRUG"),
            EntitySpan::new("headache", "SYMPTOM"),
            EntitySpan::new("tomorrow", "DATE"),
            EntitySpan::new("Acme Pharmacy", "ORG"),
            EntitySpan::new("migraine", "DIAGNOSIS"),
        ]);

        let entities = extract_entities(&model, "irrelevant").await.unwrap();
        assert_eq!(
            entities,
            vec![
                EntitySpan::new("ibuprofen", "DRUG"),
                EntitySpan::new("headache", "SYMPTOM"),
                EntitySpan::new("migraine", "DIAGNOSIS"),
            ]
        );
        assert!(entities.iter().all(|e| ENTITY_LABEL_WHITELIST.contains(&e.label.as_str())));
    }

    #[tokio::test]
    async fn test_extraction_preserves_order() {
        let model = CannedModel(vec![
            EntitySpan::new("migraine", "DIAGNOSIS"),
            EntitySpan::new("ibuprofen", "DRUG"),
        ]);
        let entities = extract_entities(&model, "irrelevant").await.unwrap();
        assert_eq!(entities[0].label, "DIAGNOSIS");
        assert_eq!(entities[1].label, "DRUG");
    }
}
