//! Feature Derivation Module
//! Appends the age_group, weekday and day_of_month columns.

use crate::data::loader::DataLoader;
use crate::schema::{derived, input};
use chrono::Datelike;
use polars::prelude::*;
use thiserror::Error;

/// Age bucket labels, in bucket order. Buckets are left-open, right-closed
/// on the cut points [0, 18, 30, 45, 60, 100].
pub const AGE_GROUP_LABELS: [&str; 5] = ["<18", "18-30", "30-45", "45-60", "60+"];

/// Weekday names in chart order.
pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unparseable Purchase_Date '{0}' reached derivation")]
    InvalidDate(String),
}

/// Computes the derived columns on a cleaned purchase-event frame.
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Map an age in years to its bucket label.
    ///
    /// Ages outside (0, 100] have no bucket; the row is dropped. This is the
    /// single place a row can be lost after cleaning.
    pub fn age_bucket(age: i64) -> Option<&'static str> {
        match age {
            1..=18 => Some(AGE_GROUP_LABELS[0]),
            19..=30 => Some(AGE_GROUP_LABELS[1]),
            31..=45 => Some(AGE_GROUP_LABELS[2]),
            46..=60 => Some(AGE_GROUP_LABELS[3]),
            61..=100 => Some(AGE_GROUP_LABELS[4]),
            _ => None,
        }
    }

    /// Append age_group, weekday and day_of_month, dropping rows whose age
    /// falls outside every bucket. Row order is otherwise preserved.
    pub fn derive(df: &DataFrame) -> Result<DataFrame, FeatureError> {
        let ages = df.column(input::AGE)?.cast(&DataType::Int64)?;
        let ages = ages.as_materialized_series().i64()?;
        let dates = df.column(input::PURCHASE_DATE)?.cast(&DataType::String)?;
        let dates = dates.as_materialized_series().str()?;

        let height = df.height();
        let mut keep = Vec::with_capacity(height);
        let mut age_groups: Vec<String> = Vec::with_capacity(height);
        let mut weekdays: Vec<String> = Vec::with_capacity(height);
        let mut days: Vec<i64> = Vec::with_capacity(height);

        for i in 0..height {
            let bucket = ages.get(i).and_then(Self::age_bucket);
            let Some(bucket) = bucket else {
                keep.push(false);
                continue;
            };

            let raw = dates.get(i).unwrap_or_default();
            let date = DataLoader::parse_date(raw)
                .ok_or_else(|| FeatureError::InvalidDate(raw.to_string()))?;

            keep.push(true);
            age_groups.push(bucket.to_string());
            weekdays.push(date.format("%A").to_string());
            days.push(i64::from(date.day()));
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let mut out = df.filter(&mask)?;
        out.with_column(Column::new(derived::AGE_GROUP.into(), age_groups))?;
        out.with_column(Column::new(derived::WEEKDAY.into(), weekdays))?;
        out.with_column(Column::new(derived::DAY_OF_MONTH.into(), days))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(FeatureBuilder::age_bucket(0), None);
        assert_eq!(FeatureBuilder::age_bucket(1), Some("<18"));
        assert_eq!(FeatureBuilder::age_bucket(17), Some("<18"));
        assert_eq!(FeatureBuilder::age_bucket(18), Some("<18"));
        assert_eq!(FeatureBuilder::age_bucket(19), Some("18-30"));
        assert_eq!(FeatureBuilder::age_bucket(30), Some("18-30"));
        assert_eq!(FeatureBuilder::age_bucket(31), Some("30-45"));
        assert_eq!(FeatureBuilder::age_bucket(45), Some("30-45"));
        assert_eq!(FeatureBuilder::age_bucket(46), Some("45-60"));
        assert_eq!(FeatureBuilder::age_bucket(60), Some("45-60"));
        assert_eq!(FeatureBuilder::age_bucket(61), Some("60+"));
        assert_eq!(FeatureBuilder::age_bucket(100), Some("60+"));
        assert_eq!(FeatureBuilder::age_bucket(101), None);
        assert_eq!(FeatureBuilder::age_bucket(150), None);
        assert_eq!(FeatureBuilder::age_bucket(-3), None);
    }

    fn frame(ages: &[i64], dates: &[&str]) -> DataFrame {
        df!(
            "Age" => ages,
            "Purchase_Date" => dates,
        )
        .unwrap()
    }

    #[test]
    fn derives_weekday_and_day_of_month() {
        let df = frame(&[25, 40], &["2024-01-08", "2024-01-09"]);
        let out = FeatureBuilder::derive(&df).unwrap();

        let weekdays: Vec<&str> = out
            .column("weekday")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(weekdays, vec!["Monday", "Tuesday"]);

        let days: Vec<i64> = out
            .column("day_of_month")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(days, vec![8, 9]);
    }

    #[test]
    fn drops_out_of_range_ages() {
        let df = frame(&[17, 18, 19, 60, 61, 0, 100, 150], &["2024-01-08"; 8]);
        let out = FeatureBuilder::derive(&df).unwrap();
        assert_eq!(out.height(), 6);

        let groups: Vec<&str> = out
            .column("age_group")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(groups, vec!["<18", "<18", "18-30", "45-60", "60+", "60+"]);
    }

    #[test]
    fn empty_frame_gets_typed_columns() {
        let df = frame(&[], &[]);
        let out = FeatureBuilder::derive(&df).unwrap();
        assert_eq!(out.height(), 0);
        assert!(out.column("age_group").is_ok());
        assert!(out.column("weekday").is_ok());
        assert!(out.column("day_of_month").is_ok());
    }
}
