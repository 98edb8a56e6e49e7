//! Pure metric computations.
//!
//! These are the standard formulas the thresholds are checked against:
//! support-weighted precision/recall/F1 for classification and MSE/R² for
//! regression. Same inputs always produce same outputs; malformed input is
//! an error, never a default score.

use rqa_core::{QaError, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// Support-weighted precision, recall, and F1 over two equal-length label
/// sequences.
///
/// Per-class metrics are averaged weighted by the class's true-label
/// support, matching the weighted-average convention of standard
/// statistics libraries. A class never seen in `y_true` carries zero
/// weight.
pub fn weighted_precision_recall_f1<T: Eq + Hash>(
    y_true: &[T],
    y_pred: &[T],
) -> Result<(f64, f64, f64)> {
    check_lengths(y_true.len(), y_pred.len())?;

    let mut true_positives: HashMap<&T, usize> = HashMap::new();
    let mut false_positives: HashMap<&T, usize> = HashMap::new();
    let mut false_negatives: HashMap<&T, usize> = HashMap::new();

    for (truth, prediction) in y_true.iter().zip(y_pred) {
        if truth == prediction {
            *true_positives.entry(truth).or_default() += 1;
        } else {
            *false_positives.entry(prediction).or_default() += 1;
            *false_negatives.entry(truth).or_default() += 1;
        }
    }

    let total = y_true.len() as f64;
    let mut precision = 0.0;
    let mut recall = 0.0;
    let mut f1 = 0.0;

    // Iterate classes present in y_true; support = TP + FN.
    let mut classes: Vec<&T> = Vec::new();
    for truth in y_true {
        if !classes.contains(&truth) {
            classes.push(truth);
        }
    }

    for class in classes {
        let tp = *true_positives.get(class).unwrap_or(&0) as f64;
        let fp = *false_positives.get(class).unwrap_or(&0) as f64;
        let fn_ = *false_negatives.get(class).unwrap_or(&0) as f64;
        let support = tp + fn_;

        let class_precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let class_recall = if support > 0.0 { tp / support } else { 0.0 };
        let class_f1 = if class_precision + class_recall > 0.0 {
            2.0 * class_precision * class_recall / (class_precision + class_recall)
        } else {
            0.0
        };

        let weight = support / total;
        precision += class_precision * weight;
        recall += class_recall * weight;
        f1 += class_f1 * weight;
    }

    Ok((precision, recall, f1))
}

/// Mean squared error over two equal-length numeric sequences.
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    let sum: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p) * (t - p)).sum();
    Ok(sum / y_true.len() as f64)
}

/// Coefficient of determination (R²) over two equal-length numeric
/// sequences.
///
/// When the truth sequence is constant the variance term is zero; the
/// result is then 1.0 for a perfect fit and 0.0 otherwise, matching the
/// reference statistics implementation.
pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;

    let mean: f64 = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p) * (t - p)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean) * (t - mean)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

fn check_lengths(true_len: usize, pred_len: usize) -> Result<()> {
    if true_len == 0 || pred_len == 0 {
        return Err(QaError::Evaluation("empty input sequence".to_string()));
    }
    if true_len != pred_len {
        return Err(QaError::Evaluation(format!(
            "sequence length mismatch: {} true vs {} predicted",
            true_len, pred_len
        )));
    }
    Ok(())
}
