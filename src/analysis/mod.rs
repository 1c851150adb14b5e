//! Analysis module - aggregate table computation

mod aggregates;

pub use aggregates::{AggregateSet, Aggregator, AnalysisError};
