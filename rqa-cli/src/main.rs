mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{ChartCommand, Cli, Commands};
use rqa_eval::{TestSummary, load_json_report, plot_confusion_matrix, plot_metric_trends};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Input shape for `rqa charts confusion`.
#[derive(Debug, Deserialize)]
struct ConfusionData {
    y_true: Vec<usize>,
    y_pred: Vec<usize>,
    labels: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize { results, strict } => {
            let summary: TestSummary = load_json_report(&results)?;
            print!("{}", summary.format_summary());
            if strict && !summary.all_passed() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Charts { chart } => match chart {
            ChartCommand::Trends { history, output } => {
                let history: Vec<BTreeMap<String, f64>> = load_json_report(&history)?;
                plot_metric_trends(&history, &output)?;
                println!("Wrote {}", output.display());
                Ok(())
            }
            ChartCommand::Confusion { data, output } => {
                let data: ConfusionData = load_json_report(&data)?;
                let labels: Vec<&str> = data.labels.iter().map(String::as_str).collect();
                plot_confusion_matrix(&data.y_true, &data.y_pred, &labels, &output)?;
                println!("Wrote {}", output.display());
                Ok(())
            }
        },
    }
}
