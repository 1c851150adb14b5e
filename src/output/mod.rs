//! Output module - CSV and chart persistence

mod sink;

pub use sink::{OutputSink, SinkError};
