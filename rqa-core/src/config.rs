//! Harness configuration.
//!
//! One YAML document with top-level sections for each test domain, loaded
//! once at startup and passed down explicitly. There is no process-wide
//! config singleton; consumers receive the sections they need.

use crate::error::{QaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level harness configuration.
///
/// Sections are optional in the document; accessing a section that is
/// absent fails with [`QaError::Config`] at first access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nlp: Option<NlpConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml: Option<MlConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting: Option<ReportingConfig>,
}

impl HarnessConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: HarnessConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// The `llm` section.
    pub fn llm(&self) -> Result<&LlmConfig> {
        self.llm.as_ref().ok_or_else(|| missing_section("llm"))
    }

    /// The `nlp` section.
    pub fn nlp(&self) -> Result<&NlpConfig> {
        self.nlp.as_ref().ok_or_else(|| missing_section("nlp"))
    }

    /// The `ml` section.
    pub fn ml(&self) -> Result<&MlConfig> {
        self.ml.as_ref().ok_or_else(|| missing_section("ml"))
    }

    /// The `aws` section.
    pub fn aws(&self) -> Result<&AwsConfig> {
        self.aws.as_ref().ok_or_else(|| missing_section("aws"))
    }

    /// The `reporting` section.
    pub fn reporting(&self) -> Result<&ReportingConfig> {
        self.reporting.as_ref().ok_or_else(|| missing_section("reporting"))
    }
}

fn missing_section(name: &str) -> QaError {
    QaError::Config(format!("missing `{}` section", name))
}

/// Chatbot configuration and response-quality thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Serverless function URL backing the chatbot, if any. When absent the
    /// chatbot adapter talks to the LLM provider directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_url: Option<String>,
    /// Model name for the direct-provider backend.
    #[serde(default = "default_model")]
    pub model: String,
    /// Custom API base for the direct-provider backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default)]
    pub evaluation: ResponseThresholds,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Thresholds for judged response quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseThresholds {
    /// Minimum acceptable relevancy score (0.0 - 1.0).
    #[serde(default = "default_relevancy")]
    pub relevancy_threshold: f64,
    /// Maximum acceptable hallucination score (0.0 - 1.0).
    #[serde(default = "default_hallucination")]
    pub hallucination_threshold: f64,
}

impl Default for ResponseThresholds {
    fn default() -> Self {
        Self {
            relevancy_threshold: default_relevancy(),
            hallucination_threshold: default_hallucination(),
        }
    }
}

fn default_relevancy() -> f64 {
    0.8
}

fn default_hallucination() -> f64 {
    0.2
}

/// NLP component configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlpConfig {
    pub entity_extraction: EntityExtractionConfig,
    pub intent_detection: IntentDetectionConfig,
}

/// Entity extraction model and score thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityExtractionConfig {
    /// Model identifier forwarded to the extraction service.
    pub model: String,
    /// URL of the hosted extraction service.
    pub endpoint_url: String,
    #[serde(default = "default_min_precision")]
    pub min_precision: f64,
    #[serde(default = "default_min_recall")]
    pub min_recall: f64,
    #[serde(default = "default_min_f1")]
    pub min_f1: f64,
}

/// Intent detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDetectionConfig {
    /// Classifier identifier. The bundled keyword matcher ignores this; a
    /// real classifier would select a model by it.
    pub model: String,
}

/// Hosted prediction endpoints and metric thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlConfig {
    /// Endpoint name -> invocation URL.
    pub endpoints: BTreeMap<String, String>,
    #[serde(default)]
    pub evaluation: MlEvaluationConfig,
}

/// Per-family evaluation thresholds for hosted models.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MlEvaluationConfig {
    #[serde(default)]
    pub classification: ClassificationThresholds,
    #[serde(default)]
    pub regression: RegressionThresholds,
}

/// Minimum acceptable classification metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    #[serde(default = "default_min_precision")]
    pub min_precision: f64,
    #[serde(default = "default_min_recall")]
    pub min_recall: f64,
    #[serde(default = "default_min_f1")]
    pub min_f1: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            min_precision: default_min_precision(),
            min_recall: default_min_recall(),
            min_f1: default_min_f1(),
        }
    }
}

fn default_min_precision() -> f64 {
    0.85
}

fn default_min_recall() -> f64 {
    0.80
}

fn default_min_f1() -> f64 {
    0.82
}

/// Acceptable regression error bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionThresholds {
    #[serde(default = "default_max_mse")]
    pub max_mse: f64,
    #[serde(default = "default_min_r2")]
    pub min_r2: f64,
}

impl Default for RegressionThresholds {
    fn default() -> Self {
        Self { max_mse: default_max_mse(), min_r2: default_min_r2() }
    }
}

fn default_max_mse() -> f64 {
    0.1
}

fn default_min_r2() -> f64 {
    0.75
}

/// AWS-facing settings for the end-to-end gateway path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,
    pub api_gateway_url: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Report output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    pub output_dir: PathBuf,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
    #[serde(default = "default_confusion_matrix_file")]
    pub confusion_matrix_file: String,
    #[serde(default = "default_metric_trends_file")]
    pub metric_trends_file: String,
}

impl ReportingConfig {
    /// Full path of the JSON summary report.
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file)
    }

    /// Full path of the confusion matrix chart.
    pub fn confusion_matrix_path(&self) -> PathBuf {
        self.output_dir.join(&self.confusion_matrix_file)
    }

    /// Full path of the metric trends chart.
    pub fn metric_trends_path(&self) -> PathBuf {
        self.output_dir.join(&self.metric_trends_file)
    }
}

fn default_summary_file() -> String {
    "test_summary.json".to_string()
}

fn default_confusion_matrix_file() -> String {
    "confusion_matrix.svg".to_string()
}

fn default_metric_trends_file() -> String {
    "metric_trends.svg".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
llm:
  function_url: "https://functions.example.com/chatbot"
  evaluation:
    relevancy_threshold: 0.85
ml:
  endpoints:
    adherence: "https://models.example.com/adherence"
    risk_score: "https://models.example.com/risk-score"
reporting:
  output_dir: "reports"
"#;

    #[test]
    fn test_parse_sections() {
        let config = HarnessConfig::from_yaml(SAMPLE).unwrap();

        let llm = config.llm().unwrap();
        assert_eq!(llm.function_url.as_deref(), Some("https://functions.example.com/chatbot"));
        assert_eq!(llm.model, "gpt-3.5-turbo");
        assert_eq!(llm.evaluation.relevancy_threshold, 0.85);
        // Unset threshold falls back to the default.
        assert_eq!(llm.evaluation.hallucination_threshold, 0.2);

        let ml = config.ml().unwrap();
        assert_eq!(ml.endpoints.len(), 2);
        assert_eq!(ml.evaluation.classification.min_precision, 0.85);
        assert_eq!(ml.evaluation.regression.max_mse, 0.1);
    }

    #[test]
    fn test_missing_section_fails_at_access() {
        let config = HarnessConfig::from_yaml(SAMPLE).unwrap();
        let err = config.nlp().unwrap_err();
        assert!(matches!(err, QaError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: missing `nlp` section");
    }

    #[test]
    fn test_reporting_paths() {
        let config = HarnessConfig::from_yaml(SAMPLE).unwrap();
        let reporting = config.reporting().unwrap();
        assert_eq!(reporting.summary_path(), PathBuf::from("reports/test_summary.json"));
        assert_eq!(
            reporting.confusion_matrix_path(),
            PathBuf::from("reports/confusion_matrix.svg")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert!(config.llm().is_ok());
        assert!(config.aws().is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = HarnessConfig::from_yaml("llm: [not, a, mapping").unwrap_err();
        assert!(matches!(err, QaError::Yaml(_)));
    }
}
