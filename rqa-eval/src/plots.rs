//! Chart rendering sinks.
//!
//! Charts are written as SVG with plotters. These functions accept score
//! data and a destination path; nothing is returned to the caller beyond
//! success, and re-rendering overwrites the previous artifact.

use plotters::prelude::*;
use rqa_core::{QaError, Result};
use std::collections::BTreeMap;
use std::path::Path;

fn chart_err(e: impl std::fmt::Display) -> QaError {
    QaError::Report(e.to_string())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Render a labeled confusion matrix.
///
/// `y_true` and `y_pred` are class indices into `labels`.
pub fn plot_confusion_matrix(
    y_true: &[usize],
    y_pred: &[usize],
    labels: &[&str],
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    if y_true.len() != y_pred.len() {
        return Err(QaError::Evaluation(format!(
            "sequence length mismatch: {} true vs {} predicted",
            y_true.len(),
            y_pred.len()
        )));
    }
    if labels.is_empty() {
        return Err(QaError::Evaluation("no class labels".to_string()));
    }

    let n = labels.len();
    let mut counts = vec![vec![0usize; n]; n];
    for (&truth, &prediction) in y_true.iter().zip(y_pred) {
        if truth >= n || prediction >= n {
            return Err(QaError::Evaluation(format!(
                "label index {} out of range for {} classes",
                truth.max(prediction),
                n
            )));
        }
        counts[truth][prediction] += 1;
    }
    let max_count = counts.iter().flatten().copied().max().unwrap_or(0).max(1);

    ensure_parent(path)?;
    let root = SVGBackend::new(path, (640, 560)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Confusion Matrix", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_desc("Predicted Label")
        .y_desc("True Label")
        .x_label_formatter(&|v| class_label(labels, *v))
        .y_label_formatter(&|v| class_label(labels, *v))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series((0..n).flat_map(|truth| {
            let counts = &counts;
            (0..n).map(move |prediction| {
                let intensity = counts[truth][prediction] as f64 / max_count as f64;
                Rectangle::new(
                    [
                        (prediction as f64, truth as f64),
                        (prediction as f64 + 1.0, truth as f64 + 1.0),
                    ],
                    BLUE.mix(intensity).filled(),
                )
            })
        }))
        .map_err(chart_err)?;

    chart
        .draw_series((0..n).flat_map(|truth| {
            let counts = &counts;
            (0..n).map(move |prediction| {
                Text::new(
                    counts[truth][prediction].to_string(),
                    (prediction as f64 + 0.45, truth as f64 + 0.5),
                    ("sans-serif", 18).into_font(),
                )
            })
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    tracing::info!(path = %path.display(), "confusion matrix saved");
    Ok(())
}

fn class_label(labels: &[&str], position: f64) -> String {
    let index = position.floor() as usize;
    labels.get(index).map(|l| l.to_string()).unwrap_or_default()
}

/// Render metric trends over successive test runs.
///
/// Each entry in `history` is one run's metric map; only keys ending in
/// `_score` or `_metric` are plotted.
pub fn plot_metric_trends(
    history: &[BTreeMap<String, f64>],
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();

    let mut keys: Vec<&str> = Vec::new();
    for run in history {
        for key in run.keys() {
            if (key.ends_with("_score") || key.ends_with("_metric"))
                && !keys.contains(&key.as_str())
            {
                keys.push(key);
            }
        }
    }
    if keys.is_empty() {
        return Err(QaError::Evaluation("no metric series to plot".to_string()));
    }
    keys.sort_unstable();

    let y_max = series_axis_max(history, &keys);
    let x_max = history.len().saturating_sub(1).max(1) as f64;

    ensure_parent(path)?;
    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Metric Trends", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Test Run")
        .y_desc("Score")
        .draw()
        .map_err(chart_err)?;

    for (index, key) in keys.iter().enumerate() {
        let color = Palette99::pick(index).to_rgba();
        let points: Vec<(f64, f64)> = history
            .iter()
            .enumerate()
            .filter_map(|(run, metrics)| metrics.get(*key).map(|v| (run as f64, *v)))
            .collect();

        chart
            .draw_series(LineSeries::new(points, &color))
            .map_err(chart_err)?
            .label(*key)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    tracing::info!(path = %path.display(), "metric trends saved");
    Ok(())
}

/// Upper y-axis bound for the trend chart, scaled to the plotted series
/// only. Values under unfiltered keys do not affect the axis.
fn series_axis_max(history: &[BTreeMap<String, f64>], keys: &[&str]) -> f64 {
    history
        .iter()
        .flat_map(|run| keys.iter().filter_map(|key| run.get(*key)))
        .copied()
        .fold(1.0f64, f64::max)
        * 1.05
}
