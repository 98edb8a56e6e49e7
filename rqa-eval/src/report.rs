//! Result aggregation and JSON report writing.
//!
//! A [`TestSummary`] accumulates pass/fail counts and metric values per
//! test domain (llm, nlp, ml, end_to_end) and is written once per run.
//! Writes overwrite the target path; re-running a suite replaces the
//! report rather than appending.

use rqa_core::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Aggregate results for one harness run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    /// Unique identifier for this run.
    pub run_id: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    /// Results keyed by domain name.
    pub domains: BTreeMap<String, DomainReport>,
}

impl Default for TestSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSummary {
    /// Start an empty summary for a new run.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: now,
            completed_at: now,
            domains: BTreeMap::new(),
        }
    }

    /// Record one case outcome under `domain`.
    pub fn record_case(&mut self, domain: &str, passed: bool) {
        let report = self.domains.entry(domain.to_string()).or_default();
        if passed {
            report.tests_passed += 1;
        } else {
            report.tests_failed += 1;
        }
        self.completed_at = chrono::Utc::now();
    }

    /// Record a named metric value under `domain`, overwriting any
    /// previous value for that name.
    pub fn record_metric(&mut self, domain: &str, name: &str, value: f64) {
        let report = self.domains.entry(domain.to_string()).or_default();
        report.metrics.insert(name.to_string(), value);
        self.completed_at = chrono::Utc::now();
    }

    /// Total failed cases across domains.
    pub fn total_failed(&self) -> usize {
        self.domains.values().map(|d| d.tests_failed).sum()
    }

    /// Whether every recorded case passed.
    pub fn all_passed(&self) -> bool {
        self.total_failed() == 0
    }

    /// Format as a human-readable string.
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Test Summary: {}\n", self.run_id));
        for (domain, report) in &self.domains {
            output.push_str(&format!(
                "  {}: {} passed, {} failed\n",
                domain, report.tests_passed, report.tests_failed
            ));
            for (name, value) in &report.metrics {
                output.push_str(&format!("    {}: {:.3}\n", name, value));
            }
        }
        output.push_str(&format!(
            "Overall: {}\n",
            if self.all_passed() { "PASS" } else { "FAIL" }
        ));
        output
    }

    /// Write the summary as a JSON report.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        save_json_report(self, path)
    }
}

/// Counts and metrics for one test domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainReport {
    pub tests_passed: usize,
    pub tests_failed: usize,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// Serialize `data` as pretty-printed JSON at `path`, creating parent
/// directories as needed and overwriting any previous report.
pub fn save_json_report<T: Serialize>(data: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(data)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "JSON report saved");
    Ok(())
}

/// Read a JSON report back.
pub fn load_json_report<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let data: T = serde_json::from_str(&content)?;
    Ok(data)
}
