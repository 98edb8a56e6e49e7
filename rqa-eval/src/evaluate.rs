//! Threshold evaluators.
//!
//! Each evaluator computes scores from predicted vs. expected data and
//! derives pass/fail flags from the configured thresholds. Evaluators are
//! pure (the response evaluator delegates scoring to the judge but adds no
//! state of its own).

use crate::entities::EntitySpan;
use crate::judge::SemanticJudge;
use crate::scoring::{mean_squared_error, r_squared, weighted_precision_recall_f1};
use rqa_core::{ClassificationThresholds, RegressionThresholds, ResponseThresholds, Result};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Weighted classification metrics with pass flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub precision_pass: bool,
    pub recall_pass: bool,
    pub f1_pass: bool,
}

impl ClassificationScores {
    /// All thresholds met.
    pub fn passed(&self) -> bool {
        self.precision_pass && self.recall_pass && self.f1_pass
    }
}

/// Evaluate classification output against thresholds.
///
/// Rejects mismatched-length inputs; see [`validate_entities`] for the
/// padding variant used in entity validation.
pub fn evaluate_classification<T: Eq + Hash>(
    y_true: &[T],
    y_pred: &[T],
    thresholds: &ClassificationThresholds,
) -> Result<ClassificationScores> {
    let (precision, recall, f1) = weighted_precision_recall_f1(y_true, y_pred)?;
    let scores = ClassificationScores {
        precision,
        recall,
        f1,
        precision_pass: precision >= thresholds.min_precision,
        recall_pass: recall >= thresholds.min_recall,
        f1_pass: f1 >= thresholds.min_f1,
    };
    tracing::info!(
        precision = scores.precision,
        recall = scores.recall,
        f1 = scores.f1,
        passed = scores.passed(),
        "classification evaluation"
    );
    Ok(scores)
}

/// Regression metrics with pass flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionScores {
    pub mse: f64,
    pub r2: f64,
    pub mse_pass: bool,
    pub r2_pass: bool,
}

impl RegressionScores {
    /// All thresholds met.
    pub fn passed(&self) -> bool {
        self.mse_pass && self.r2_pass
    }
}

/// Evaluate regression output against thresholds.
pub fn evaluate_regression(
    y_true: &[f64],
    y_pred: &[f64],
    thresholds: &RegressionThresholds,
) -> Result<RegressionScores> {
    let mse = mean_squared_error(y_true, y_pred)?;
    let r2 = r_squared(y_true, y_pred)?;
    let scores = RegressionScores {
        mse,
        r2,
        mse_pass: mse <= thresholds.max_mse,
        r2_pass: r2 >= thresholds.min_r2,
    };
    tracing::info!(mse = scores.mse, r2 = scores.r2, passed = scores.passed(), "regression evaluation");
    Ok(scores)
}

/// Entity validation metrics (no pass flags; thresholds are applied by the
/// scenario layer from the `nlp` config section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Score extracted entities against the expected set.
///
/// Unlike [`evaluate_classification`], mismatched counts are not an error:
/// the shorter label sequence is padded with the sentinel `"None"` before
/// scoring, so under- or over-generation degrades the scores instead of
/// aborting the case. This policy is intentional and fixture-visible; do
/// not change it without migrating the fixtures.
pub fn validate_entities(
    extracted: &[EntitySpan],
    expected: &[EntitySpan],
) -> Result<EntityScores> {
    let mut y_true: Vec<&str> = expected.iter().map(|e| e.label.as_str()).collect();
    let mut y_pred: Vec<&str> = extracted.iter().map(|e| e.label.as_str()).collect();

    if y_true.len() != y_pred.len() {
        tracing::warn!(
            expected = y_true.len(),
            extracted = y_pred.len(),
            "entity count mismatch; padding with None"
        );
        let max_len = y_true.len().max(y_pred.len());
        y_true.resize(max_len, "None");
        y_pred.resize(max_len, "None");
    }

    let (precision, recall, f1) = weighted_precision_recall_f1(&y_true, &y_pred)?;
    Ok(EntityScores { precision, recall, f1 })
}

/// Judged response quality with pass flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseScores {
    pub relevancy_score: f64,
    pub hallucination_score: f64,
    pub relevancy_pass: bool,
    pub hallucination_pass: bool,
}

impl ResponseScores {
    /// All thresholds met.
    pub fn passed(&self) -> bool {
        self.relevancy_pass && self.hallucination_pass
    }
}

/// Evaluate a chatbot response with the semantic judge and threshold the
/// two returned scores (relevancy ≥ min, hallucination ≤ max).
pub async fn evaluate_response(
    judge: &dyn SemanticJudge,
    query: &str,
    response: &str,
    context: Option<&str>,
    thresholds: &ResponseThresholds,
) -> Result<ResponseScores> {
    let relevancy_score = judge.relevancy(query, response, context).await?;
    let hallucination_score = judge.hallucination(response, context).await?;
    let scores = ResponseScores {
        relevancy_score,
        hallucination_score,
        relevancy_pass: relevancy_score >= thresholds.relevancy_threshold,
        hallucination_pass: hallucination_score <= thresholds.hallucination_threshold,
    };
    tracing::info!(
        relevancy = scores.relevancy_score,
        hallucination = scores.hallucination_score,
        passed = scores.passed(),
        "response evaluation"
    );
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::FixedJudge;
    use rqa_core::QaError;

    fn default_classification() -> ClassificationThresholds {
        ClassificationThresholds::default()
    }

    #[test]
    fn test_classification_pass_flags() {
        let scores =
            evaluate_classification(&[1, 0, 1, 1], &[1, 0, 1, 1], &default_classification())
                .unwrap();
        assert!(scores.passed());
        assert_eq!(scores.precision, 1.0);

        let scores =
            evaluate_classification(&[1, 1, 1, 1], &[0, 0, 0, 1], &default_classification())
                .unwrap();
        assert!(!scores.passed());
        assert!(!scores.recall_pass);
    }

    #[test]
    fn test_classification_rejects_mismatched_lengths() {
        let err = evaluate_classification(&[1, 0], &[1], &default_classification()).unwrap_err();
        assert!(matches!(err, QaError::Evaluation(_)));
    }

    #[test]
    fn test_regression_pass_flags() {
        let thresholds = RegressionThresholds::default();
        let scores = evaluate_regression(
            &[0.1, 0.5, 0.9, 0.4],
            &[0.12, 0.48, 0.88, 0.41],
            &thresholds,
        )
        .unwrap();
        assert!(scores.mse_pass);
        assert!(scores.r2_pass);

        let scores =
            evaluate_regression(&[0.1, 0.5, 0.9, 0.4], &[0.9, 0.1, 0.2, 0.9], &thresholds)
                .unwrap();
        assert!(!scores.passed());
    }

    #[test]
    fn test_entity_padding_changes_scores() {
        let expected = vec![
            EntitySpan::new("ibuprofen", "DRUG"),
            EntitySpan::new("headache", "SYMPTOM"),
            EntitySpan::new("migraine", "DIAGNOSIS"),
        ];
        let extracted = vec![
            EntitySpan::new("ibuprofen", "DRUG"),
            EntitySpan::new("headache", "SYMPTOM"),
        ];

        // Padded: y_true [DRUG, SYMPTOM, DIAGNOSIS], y_pred [DRUG, SYMPTOM, None].
        let padded = validate_entities(&extracted, &expected).unwrap();
        assert!((padded.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((padded.precision - 2.0 / 3.0).abs() < 1e-12);

        // An unpadded comparison over the common prefix would be perfect,
        // so the padding demonstrably lowers the scores.
        let unpadded = validate_entities(&extracted, &expected[..2].to_vec()).unwrap();
        assert_eq!(unpadded.precision, 1.0);
        assert_eq!(unpadded.recall, 1.0);
    }

    #[test]
    fn test_entity_padding_extracted_longer() {
        let expected = vec![EntitySpan::new("ibuprofen", "DRUG")];
        let extracted = vec![
            EntitySpan::new("ibuprofen", "DRUG"),
            EntitySpan::new("headache", "SYMPTOM"),
        ];
        // y_true padded to [DRUG, None]; the spurious SYMPTOM counts
        // against precision and the padded None against recall.
        let scores = validate_entities(&extracted, &expected).unwrap();
        assert!(scores.precision < 1.0);
        assert!(scores.recall < 1.0);
    }

    #[test]
    fn test_entity_validation_empty_both_sides() {
        let err = validate_entities(&[], &[]).unwrap_err();
        assert!(matches!(err, QaError::Evaluation(_)));
    }

    #[tokio::test]
    async fn test_response_evaluation_thresholds() {
        let thresholds = ResponseThresholds::default();

        let judge = FixedJudge::new(0.9, 0.1);
        let scores =
            evaluate_response(&judge, "q", "r", None, &thresholds).await.unwrap();
        assert!(scores.passed());

        let judge = FixedJudge::new(0.7, 0.1);
        let scores =
            evaluate_response(&judge, "q", "r", None, &thresholds).await.unwrap();
        assert!(!scores.relevancy_pass);
        assert!(scores.hallucination_pass);

        let judge = FixedJudge::new(0.9, 0.5);
        let scores =
            evaluate_response(&judge, "q", "r", None, &thresholds).await.unwrap();
        assert!(!scores.hallucination_pass);
    }
}
