//! Combined flow: chatbot response feeds entity extraction, intent
//! detection, and a hosted binary classifier.

use async_trait::async_trait;
use rqa_client::{ChatbotClient, ModelEndpointClient};
use rqa_core::{HarnessConfig, MlConfig, Result};
use rqa_eval::{
    EndToEndScenario, EntityModel, EntitySpan, KeywordIntentClassifier, LlmFixture,
    ScenarioRunner,
};
use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

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

async fn wired_runner(server: &MockServer) -> ScenarioRunner {
    let chatbot_url = format!("{}/chatbot", server.uri());
    let ml = MlConfig {
        endpoints: BTreeMap::from([(
            "eligibility".to_string(),
            format!("{}/eligibility", server.uri()),
        )]),
        evaluation: Default::default(),
    };
    ScenarioRunner::new(HarnessConfig::default())
        .with_chatbot(ChatbotClient::for_function(&chatbot_url, None).unwrap())
        .with_endpoints(ModelEndpointClient::from_config(&ml).unwrap())
}

fn eligibility_scenario() -> EndToEndScenario {
    EndToEndScenario {
        fixture: LlmFixture {
            query: "Is ibuprofen covered?".to_string(),
            expected_response: "covered".to_string(),
            context: None,
        },
        expected_intent: "medication_query".to_string(),
        expected_entities: vec![EntitySpan::new("ibuprofen", "DRUG")],
        ml_endpoint: "eligibility".to_string(),
        ml_payload: json!({"member_id": "M-1001", "drug": "ibuprofen"}),
    }
}

#[tokio::test]
async fn test_end_to_end_passes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Yes, ibuprofen is covered for your medication query."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/eligibility"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": 1})))
        .mount(&server)
        .await;

    let mut runner = wired_runner(&server).await;
    let entity_model = CannedModel(vec![EntitySpan::new("ibuprofen", "DRUG")]);
    let intents = KeywordIntentClassifier::new();

    let outcome = runner
        .run_end_to_end(&eligibility_scenario(), &entity_model, &intents)
        .await
        .unwrap();

    assert!(outcome.passed, "failures: {:?}", outcome.failures);
    assert_eq!(runner.summary().domains["end_to_end"].tests_passed, 1);
}

#[tokio::test]
async fn test_end_to_end_fails_on_non_binary_prediction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Yes, ibuprofen is covered for your medication query."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/eligibility"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": 0.73})))
        .mount(&server)
        .await;

    let mut runner = wired_runner(&server).await;
    let entity_model = CannedModel(vec![EntitySpan::new("ibuprofen", "DRUG")]);
    let intents = KeywordIntentClassifier::new();

    let outcome = runner
        .run_end_to_end(&eligibility_scenario(), &entity_model, &intents)
        .await
        .unwrap();

    assert!(!outcome.passed);
    assert!(outcome.failures.iter().any(|f| f.contains("binary prediction")));
    assert_eq!(runner.summary().domains["end_to_end"].tests_failed, 1);
}

#[tokio::test]
async fn test_end_to_end_collects_all_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "I cannot help with that."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/eligibility"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": 1})))
        .mount(&server)
        .await;

    let mut runner = wired_runner(&server).await;
    let entity_model = CannedModel(vec![]);
    let intents = KeywordIntentClassifier::new();

    let outcome = runner
        .run_end_to_end(&eligibility_scenario(), &entity_model, &intents)
        .await
        .unwrap();

    // Response text, entity, and intent checks all miss; each failure is
    // reported rather than stopping at the first.
    assert!(!outcome.passed);
    assert_eq!(outcome.failures.len(), 3);
}
