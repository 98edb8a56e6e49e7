use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rqa")]
#[command(about = "Rebate QA harness CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a summary of a harness results file
    Summarize {
        /// Path to the JSON summary report
        #[arg(short, long)]
        results: PathBuf,

        /// Exit non-zero when any test failed
        #[arg(long)]
        strict: bool,
    },

    /// Render SVG charts from result files
    Charts {
        #[command(subcommand)]
        chart: ChartCommand,
    },
}

#[derive(Subcommand)]
pub enum ChartCommand {
    /// Plot metric trends across test runs
    Trends {
        /// JSON file holding an array of per-run metric maps
        #[arg(long)]
        history: PathBuf,

        /// Output SVG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Plot a confusion matrix
    Confusion {
        /// JSON file holding y_true, y_pred, and labels arrays
        #[arg(long)]
        data: PathBuf,

        /// Output SVG path
        #[arg(short, long)]
        output: PathBuf,
    },
}
