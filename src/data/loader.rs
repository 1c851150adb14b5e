//! CSV Data Loader Module
//! Reads the purchase-event CSV into a DataFrame using Polars.

use crate::schema::input;
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Date format accepted in `Purchase_Date` (ISO-8601 calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    FileNotFound(String),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Unparseable Purchase_Date '{value}' in data row {row}")]
    InvalidDate { row: usize, value: String },
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and validate every non-empty `Purchase_Date` value.
    ///
    /// The date column stays a string column; `cleaned_data.csv` echoes the
    /// input text verbatim and derivation parses it again on demand.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        Self::validate_dates(&df)?;
        Ok(df)
    }

    /// Parse an ISO-8601 date cell. Trims surrounding whitespace.
    pub fn parse_date(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
    }

    fn validate_dates(df: &DataFrame) -> Result<(), LoaderError> {
        // An absent column is a schema problem reported elsewhere.
        let Ok(dates) = df.column(input::PURCHASE_DATE) else {
            return Ok(());
        };
        let dates = dates.cast(&DataType::String)?;
        let dates = dates.as_materialized_series().str()?;

        for (row, value) in dates.iter().enumerate() {
            let Some(raw) = value else { continue };
            if raw.trim().is_empty() {
                continue; // missing value; the cleaner drops the row
            }
            if Self::parse_date(raw).is_none() {
                return Err(LoaderError::InvalidDate {
                    row,
                    value: raw.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Customer_ID,Age,Gender,City,Category,Product_Name,Purchase_Date,Purchase_Amount,Repeat_Customer,Discount_Applied,Rating";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_well_formed_csv() {
        let file = write_csv(&["C1,25,M,NY,Toys,Car,2024-01-08,100.0,yes,no,4.0"]);
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 11);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = DataLoader::load_csv(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[test]
    fn bad_date_is_an_input_error() {
        let file = write_csv(&["C1,25,M,NY,Toys,Car,Jan 8th,100.0,yes,no,4.0"]);
        let err = DataLoader::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidDate { row: 0, .. }));
    }

    #[test]
    fn empty_date_cell_is_left_for_the_cleaner() {
        let file = write_csv(&[
            "C1,25,M,NY,Toys,Car,2024-01-08,100.0,yes,no,4.0",
            "C2,40,F,NY,Toys,Car,,50.0,no,yes,5.0",
        ]);
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn parse_date_accepts_iso_only() {
        assert!(DataLoader::parse_date("2024-02-29").is_some());
        assert!(DataLoader::parse_date(" 2024-01-08 ").is_some());
        assert!(DataLoader::parse_date("08/01/2024").is_none());
        assert!(DataLoader::parse_date("2024-13-01").is_none());
    }
}
