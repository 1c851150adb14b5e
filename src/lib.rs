//! Retail Insights - batch analytics over retail customer purchases.
//!
//! A linear, single-pass pipeline: load the purchase CSV, drop incomplete
//! rows, derive age_group/weekday/day_of_month, compute nine aggregate
//! tables, and write CSVs plus PNG charts into one output directory.

pub mod analysis;
pub mod charts;
pub mod data;
pub mod output;
pub mod schema;

use std::path::Path;

use analysis::Aggregator;
use anyhow::Result;
use data::{DataCleaner, DataLoader, FeatureBuilder};
use output::OutputSink;
use tracing::info;

/// Run the full pipeline from an input CSV to a populated output directory.
pub fn run(input: &Path, output_dir: &Path) -> Result<()> {
    let raw = DataLoader::load_csv(input)?;
    schema::validate_columns(&raw)?;
    info!(rows = raw.height(), "Loaded input table");

    let cleaned = DataCleaner::drop_incomplete(&raw)?;
    if cleaned.height() < raw.height() {
        info!(
            dropped = raw.height() - cleaned.height(),
            "Dropped rows with missing values"
        );
    }

    let mut derived = FeatureBuilder::derive(&cleaned)?;
    let mut aggregates = Aggregator::compute(&derived)?;

    let sink = OutputSink::new(output_dir)?;
    sink.write_all(&mut derived, &mut aggregates)?;

    info!("All analysis complete. Files saved in: {}", sink.dir().display());
    Ok(())
}
