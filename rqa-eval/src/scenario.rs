//! Scenario suites.
//!
//! The [`ScenarioRunner`] drives one harness run: it walks fixture lists
//! case by case, calls the deployed components through their adapters,
//! scores the results, and accumulates everything into a [`TestSummary`].
//! Cases within a suite run strictly one at a time; a transport or
//! configuration failure aborts the suite, while a semantic mismatch is
//! recorded as a failed case and the suite continues.

use crate::entities::{EntityModel, extract_entities};
use crate::evaluate::{
    evaluate_classification, evaluate_regression, evaluate_response, validate_entities,
};
use crate::intent::IntentClassifier;
use crate::judge::SemanticJudge;
use crate::report::TestSummary;
use crate::schema::{LlmFixture, MlFixture, NlpFixture};
use rqa_client::{ChatbotClient, ModelEndpointClient};
use rqa_core::{CredentialsManager, HarnessConfig, QaError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of a single fixture case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    /// Identifier for the case, derived from the fixture input.
    pub id: String,
    pub passed: bool,
    /// One message per failed check; empty when the case passed.
    pub failures: Vec<String>,
    /// Numeric scores produced while checking the case.
    pub scores: BTreeMap<String, f64>,
}

impl CaseOutcome {
    fn passing(id: impl Into<String>) -> Self {
        Self { id: id.into(), passed: true, failures: Vec::new(), scores: BTreeMap::new() }
    }

    fn fail(&mut self, message: String) {
        self.passed = false;
        self.failures.push(message);
    }
}

/// Drives the test suites against the deployed components.
pub struct ScenarioRunner {
    config: HarnessConfig,
    chatbot: Option<ChatbotClient>,
    endpoints: Option<ModelEndpointClient>,
    judge: Option<Box<dyn SemanticJudge>>,
    summary: TestSummary,
}

impl ScenarioRunner {
    /// Create a runner with no clients attached. Attach them with the
    /// `with_*` builders, or use [`ScenarioRunner::from_credentials`].
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            chatbot: None,
            endpoints: None,
            judge: None,
            summary: TestSummary::new(),
        }
    }

    /// Build a fully wired runner: a chatbot client and LLM judge when the
    /// `llm` section is present, and an endpoint client when the `ml`
    /// section is present.
    pub fn from_credentials(
        config: HarnessConfig,
        credentials: &CredentialsManager,
    ) -> Result<Self> {
        let mut runner = Self::new(config);
        if let Some(llm) = runner.config.llm.clone() {
            let api_key = credentials.get_openai_api_key()?;
            runner.chatbot = Some(ChatbotClient::from_config(&llm, &api_key)?);
            runner.judge = Some(Box::new(crate::judge::LlmJudge::new(
                ChatbotClient::from_config(&llm, &api_key)?,
            )));
        }
        if let Some(ml) = &runner.config.ml {
            runner.endpoints = Some(ModelEndpointClient::from_config(ml)?);
        }
        Ok(runner)
    }

    pub fn with_chatbot(mut self, chatbot: ChatbotClient) -> Self {
        self.chatbot = Some(chatbot);
        self
    }

    pub fn with_endpoints(mut self, endpoints: ModelEndpointClient) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    pub fn with_judge(mut self, judge: Box<dyn SemanticJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    fn chatbot(&self) -> Result<&ChatbotClient> {
        self.chatbot
            .as_ref()
            .ok_or_else(|| QaError::Config("no chatbot client configured".to_string()))
    }

    fn endpoints(&self) -> Result<&ModelEndpointClient> {
        self.endpoints
            .as_ref()
            .ok_or_else(|| QaError::Config("no endpoint client configured".to_string()))
    }

    /// Run the chatbot suite.
    ///
    /// Each case sends the fixture query, checks that the expected phrase
    /// appears in the response (case-insensitive), and, when a judge is
    /// attached, scores the response against the `llm` thresholds. Average
    /// judge scores land in the summary metrics.
    pub async fn run_llm_suite(&mut self, fixtures: &[LlmFixture]) -> Result<Vec<CaseOutcome>> {
        let thresholds = self.config.llm()?.evaluation.clone();
        let mut outcomes = Vec::with_capacity(fixtures.len());
        let mut relevancy_sum = 0.0;
        let mut hallucination_sum = 0.0;
        let mut judged = 0usize;

        for fixture in fixtures {
            let mut outcome = CaseOutcome::passing(&fixture.query);
            let response =
                self.chatbot()?.ask(&fixture.query, fixture.context.as_deref()).await?;

            if !contains_case_insensitive(&response, &fixture.expected_response) {
                outcome.fail(format!(
                    "expected '{}' in response, got '{}'",
                    fixture.expected_response, response
                ));
            }

            if let Some(judge) = &self.judge {
                let scores = evaluate_response(
                    judge.as_ref(),
                    &fixture.query,
                    &response,
                    fixture.context.as_deref(),
                    &thresholds,
                )
                .await?;
                outcome.scores.insert("relevancy_score".to_string(), scores.relevancy_score);
                outcome
                    .scores
                    .insert("hallucination_score".to_string(), scores.hallucination_score);
                if !scores.relevancy_pass {
                    outcome.fail(format!(
                        "relevancy {:.3} below threshold {:.3}",
                        scores.relevancy_score, thresholds.relevancy_threshold
                    ));
                }
                if !scores.hallucination_pass {
                    outcome.fail(format!(
                        "hallucination {:.3} above threshold {:.3}",
                        scores.hallucination_score, thresholds.hallucination_threshold
                    ));
                }
                relevancy_sum += scores.relevancy_score;
                hallucination_sum += scores.hallucination_score;
                judged += 1;
            }

            self.summary.record_case("llm", outcome.passed);
            outcomes.push(outcome);
        }

        if judged > 0 {
            self.summary.record_metric("llm", "relevancy_score", relevancy_sum / judged as f64);
            self.summary.record_metric(
                "llm",
                "hallucination_score",
                hallucination_sum / judged as f64,
            );
        }
        Ok(outcomes)
    }

    /// Run the NLP suite against an entity model and intent classifier.
    ///
    /// Entity scores are checked per case against the `nlp` section
    /// thresholds; the intent prediction must match the fixture exactly.
    pub async fn run_nlp_suite(
        &mut self,
        entity_model: &dyn EntityModel,
        intents: &dyn IntentClassifier,
        fixtures: &[NlpFixture],
    ) -> Result<Vec<CaseOutcome>> {
        let nlp = self.config.nlp()?.clone();
        let mut outcomes = Vec::with_capacity(fixtures.len());
        let mut f1_sum = 0.0;

        for fixture in fixtures {
            let mut outcome = CaseOutcome::passing(&fixture.text);

            let extracted = extract_entities(entity_model, &fixture.text).await?;
            let scores = validate_entities(&extracted, &fixture.expected_entities)?;
            outcome.scores.insert("entity_precision_metric".to_string(), scores.precision);
            outcome.scores.insert("entity_recall_metric".to_string(), scores.recall);
            outcome.scores.insert("entity_f1_metric".to_string(), scores.f1);
            let extraction = &nlp.entity_extraction;
            if scores.precision < extraction.min_precision {
                outcome.fail(format!(
                    "entity precision {:.3} below threshold {:.3}",
                    scores.precision, extraction.min_precision
                ));
            }
            if scores.recall < extraction.min_recall {
                outcome.fail(format!(
                    "entity recall {:.3} below threshold {:.3}",
                    scores.recall, extraction.min_recall
                ));
            }
            if scores.f1 < extraction.min_f1 {
                outcome.fail(format!(
                    "entity f1 {:.3} below threshold {:.3}",
                    scores.f1, extraction.min_f1
                ));
            }
            f1_sum += scores.f1;

            let intent = intents.classify(&fixture.text);
            if intent != fixture.expected_intent {
                outcome.fail(format!(
                    "expected intent '{}', got '{}'",
                    fixture.expected_intent, intent
                ));
            }

            self.summary.record_case("nlp", outcome.passed);
            outcomes.push(outcome);
        }

        if !fixtures.is_empty() {
            self.summary.record_metric(
                "nlp",
                "entity_f1_metric",
                f1_sum / fixtures.len() as f64,
            );
        }
        Ok(outcomes)
    }

    /// Run the hosted-model suite.
    ///
    /// Classification fixtures must return their expected label exactly;
    /// regression fixtures must land within an absolute tolerance of 0.1.
    /// Across the whole suite the collected predictions are additionally
    /// scored against the `ml` section thresholds and recorded as metrics.
    pub async fn run_ml_suite(&mut self, fixtures: &[MlFixture]) -> Result<Vec<CaseOutcome>> {
        let evaluation = self.config.ml()?.evaluation.clone();
        let mut outcomes = Vec::with_capacity(fixtures.len());
        let mut label_pairs: Vec<(i64, i64)> = Vec::new();
        let mut score_pairs: Vec<(f64, f64)> = Vec::new();

        for fixture in fixtures {
            let mut outcome =
                CaseOutcome::passing(format!("{}:{}", fixture.model, fixture.input));
            let body = self.endpoints()?.invoke(&fixture.model, &fixture.input).await?;
            let prediction = prediction_field(&fixture.model, &body)?;

            if let Some(expected) = fixture.expected_label {
                let predicted = prediction
                    .as_i64()
                    .or_else(|| prediction.as_f64().map(|f| f.round() as i64))
                    .ok_or_else(|| {
                        QaError::Evaluation(format!(
                            "endpoint `{}` returned non-numeric prediction: {}",
                            fixture.model, prediction
                        ))
                    })?;
                outcome.scores.insert("prediction".to_string(), predicted as f64);
                if predicted != expected {
                    outcome.fail(format!(
                        "expected label {}, got {}",
                        expected, predicted
                    ));
                }
                label_pairs.push((expected, predicted));
            } else if let Some(expected) = fixture.expected_score {
                let predicted = prediction.as_f64().ok_or_else(|| {
                    QaError::Evaluation(format!(
                        "endpoint `{}` returned non-numeric prediction: {}",
                        fixture.model, prediction
                    ))
                })?;
                outcome.scores.insert("prediction".to_string(), predicted);
                if (predicted - expected).abs() > 0.1 {
                    outcome.fail(format!(
                        "expected score near {:.3}, got {:.3}",
                        expected, predicted
                    ));
                }
                score_pairs.push((expected, predicted));
            } else {
                return Err(QaError::Evaluation(format!(
                    "fixture for `{}` has neither expected_label nor expected_score",
                    fixture.model
                )));
            }

            self.summary.record_case("ml", outcome.passed);
            outcomes.push(outcome);
        }

        if !label_pairs.is_empty() {
            let y_true: Vec<i64> = label_pairs.iter().map(|p| p.0).collect();
            let y_pred: Vec<i64> = label_pairs.iter().map(|p| p.1).collect();
            let scores = evaluate_classification(&y_true, &y_pred, &evaluation.classification)?;
            self.summary.record_metric("ml", "precision_metric", scores.precision);
            self.summary.record_metric("ml", "recall_metric", scores.recall);
            self.summary.record_metric("ml", "f1_metric", scores.f1);
            self.summary.record_case("ml", scores.passed());
        }
        if !score_pairs.is_empty() {
            let y_true: Vec<f64> = score_pairs.iter().map(|p| p.0).collect();
            let y_pred: Vec<f64> = score_pairs.iter().map(|p| p.1).collect();
            let scores = evaluate_regression(&y_true, &y_pred, &evaluation.regression)?;
            self.summary.record_metric("ml", "mse_metric", scores.mse);
            self.summary.record_metric("ml", "r2_metric", scores.r2);
            self.summary.record_case("ml", scores.passed());
        }
        Ok(outcomes)
    }

    /// Run one combined flow through every component.
    pub async fn run_end_to_end(
        &mut self,
        scenario: &EndToEndScenario,
        entity_model: &dyn EntityModel,
        intents: &dyn IntentClassifier,
    ) -> Result<CaseOutcome> {
        let mut outcome = CaseOutcome::passing(&scenario.fixture.query);

        let response = self
            .chatbot()?
            .ask(&scenario.fixture.query, scenario.fixture.context.as_deref())
            .await?;
        if !contains_case_insensitive(&response, &scenario.fixture.expected_response) {
            outcome.fail(format!(
                "expected '{}' in response, got '{}'",
                scenario.fixture.expected_response, response
            ));
        }

        let extracted = extract_entities(entity_model, &response).await?;
        for expected in &scenario.expected_entities {
            if !extracted.contains(expected) {
                outcome.fail(format!(
                    "expected entity {}/{} not found in response",
                    expected.text, expected.label
                ));
            }
        }

        let intent = intents.classify(&response);
        if intent != scenario.expected_intent {
            outcome.fail(format!(
                "expected intent '{}', got '{}'",
                scenario.expected_intent, intent
            ));
        }

        let body = self.endpoints()?.invoke(&scenario.ml_endpoint, &scenario.ml_payload).await?;
        let prediction = prediction_field(&scenario.ml_endpoint, &body)?;
        match prediction.as_i64() {
            Some(0) | Some(1) => {}
            _ => outcome.fail(format!("expected a binary prediction, got {}", prediction)),
        }

        self.summary.record_case("end_to_end", outcome.passed);
        Ok(outcome)
    }

    /// The summary accumulated so far.
    pub fn summary(&self) -> &TestSummary {
        &self.summary
    }

    /// Consume the runner, yielding the final summary.
    pub fn into_summary(self) -> TestSummary {
        self.summary
    }

    /// Write the summary to the path named by the `reporting` section.
    pub fn write_report(&self) -> Result<PathBuf> {
        let path = self.config.reporting()?.summary_path();
        self.summary.write(&path)?;
        Ok(path)
    }
}

/// One end-to-end flow: a chatbot exchange whose response is pushed
/// through entity extraction and intent detection, followed by a hosted
/// binary-classification call.
#[derive(Debug, Clone)]
pub struct EndToEndScenario {
    pub fixture: LlmFixture,
    pub expected_intent: String,
    pub expected_entities: Vec<crate::entities::EntitySpan>,
    pub ml_endpoint: String,
    pub ml_payload: Value,
}

fn prediction_field<'a>(endpoint: &str, body: &'a Value) -> Result<&'a Value> {
    body.get("prediction").ok_or_else(|| {
        QaError::Evaluation(format!(
            "endpoint `{}` response missing `prediction` field",
            endpoint
        ))
    })
}

fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
