//! Data Cleaner Module
//! Drops rows with missing values before any derivation or aggregation.

use crate::schema::input;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Handles removal of incomplete purchase events.
pub struct DataCleaner;

impl DataCleaner {
    /// Drop every row in which any required field is missing.
    ///
    /// Missing means a null cell, a string cell that is empty after trimming,
    /// or a float NaN. Surviving rows keep their original order; the
    /// operation is idempotent.
    pub fn drop_incomplete(df: &DataFrame) -> Result<DataFrame, CleanerError> {
        let mut keep = vec![true; df.height()];

        for name in input::REQUIRED {
            let Ok(column) = df.column(name) else {
                continue; // schema validation reports absent columns
            };
            let series = column.as_materialized_series();
            for (i, flag) in keep.iter_mut().enumerate() {
                if !*flag {
                    continue;
                }
                if let Ok(value) = series.get(i) {
                    if Self::is_missing(&value) {
                        *flag = false;
                    }
                } else {
                    *flag = false;
                }
            }
        }

        // A numeric column that inferred as text (some cell is not a number)
        // still has to be numeric per row; treat unparseable cells as missing.
        for name in [input::AGE, input::PURCHASE_AMOUNT, input::RATING] {
            let Ok(column) = df.column(name) else {
                continue;
            };
            if column.dtype() != &DataType::String {
                continue;
            }
            let values = column.as_materialized_series().str()?;
            for (i, flag) in keep.iter_mut().enumerate() {
                if !*flag {
                    continue;
                }
                if let Some(v) = values.get(i) {
                    if v.trim().parse::<f64>().is_err() {
                        *flag = false;
                    }
                }
            }
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(df.filter(&mask)?)
    }

    fn is_missing(value: &AnyValue) -> bool {
        match value {
            AnyValue::Null => true,
            AnyValue::String(s) => s.trim().is_empty(),
            AnyValue::StringOwned(s) => s.trim().is_empty(),
            AnyValue::Float64(f) => f.is_nan(),
            AnyValue::Float32(f) => f.is_nan(),
            _ => false,
        }
    }
}
