//! Evaluation suites for the rebate platform's AI components.
//!
//! This crate turns fixture files into scored, thresholded test runs:
//! chatbot responses are judged for relevancy and hallucination, entity
//! and intent predictions are scored against expectations, and hosted
//! model endpoints are checked against classification and regression
//! thresholds. Results aggregate into a JSON summary plus SVG charts.
//!
//! The usual entry point is [`ScenarioRunner`], wired from a
//! [`rqa_core::HarnessConfig`] and a [`rqa_core::CredentialsManager`].

pub mod entities;
pub mod evaluate;
pub mod intent;
pub mod judge;
pub mod plots;
pub mod report;
pub mod scenario;
pub mod schema;
pub mod scoring;

pub use entities::{ENTITY_LABEL_WHITELIST, EntityModel, EntitySpan, HostedEntityModel,
    extract_entities};
pub use evaluate::{
    ClassificationScores, EntityScores, RegressionScores, ResponseScores,
    evaluate_classification, evaluate_regression, evaluate_response, validate_entities,
};
pub use intent::{IntentClassifier, KeywordIntentClassifier};
pub use judge::{FixedJudge, LlmJudge, SemanticJudge};
pub use plots::{plot_confusion_matrix, plot_metric_trends};
pub use report::{DomainReport, TestSummary, load_json_report, save_json_report};
pub use scenario::{CaseOutcome, EndToEndScenario, ScenarioRunner};
pub use schema::{LlmFixture, MlFixture, NlpFixture, load_fixtures};
