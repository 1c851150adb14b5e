//! CLI entry point for the retail purchase analytics pipeline.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retail_insights")]
#[command(about = "Batch analytics over a retail customer purchase CSV", long_about = None)]
struct Cli {
    /// Path to the purchase-event CSV file
    #[arg(value_name = "INPUT_CSV")]
    input: PathBuf,

    /// Directory to write the aggregate CSVs and charts into
    #[arg(short, long, default_value = "walmart_sales_analysis")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    retail_insights::run(&cli.input, &cli.output_dir)
}
