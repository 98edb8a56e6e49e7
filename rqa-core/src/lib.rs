//! # rqa-core
//!
//! Core types for the Rebate QA harness: the error taxonomy, the harness
//! configuration document, and environment-backed credential resolution.
//!
//! Everything here is config-in, value-out. Configuration is loaded once
//! and passed down explicitly; credentials are resolved per call and never
//! cached.

pub mod config;
pub mod credentials;
pub mod error;

pub use config::{
    AwsConfig, ClassificationThresholds, EntityExtractionConfig, HarnessConfig,
    IntentDetectionConfig, LlmConfig, MlConfig, MlEvaluationConfig, NlpConfig,
    RegressionThresholds, ReportingConfig, ResponseThresholds,
};
pub use credentials::{AwsCredentials, CredentialsManager};
pub use error::{QaError, Result};
