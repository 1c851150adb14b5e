//! Output Sink Module
//! Writes the cleaned table and aggregates as CSV and emits the chart PNGs.

use crate::analysis::AggregateSet;
use crate::charts::{ChartRenderer, DEFAULT_BLUE, GREEN, ORANGE, PURPLE, SKY_BLUE};
use crate::data::{AGE_GROUP_LABELS, WEEKDAY_ORDER};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to write '{path}': {source}")]
    Csv { path: String, source: PolarsError },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("{failed} output file(s) could not be written")]
    Partial { failed: usize },
}

/// Writes every run output into one directory.
pub struct OutputSink {
    dir: PathBuf,
}

impl OutputSink {
    /// Create the output directory if missing. Existing contents are kept.
    pub fn new(dir: &Path) -> Result<Self, SinkError> {
        fs::create_dir_all(dir).map_err(|source| SinkError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write all ten CSVs, then the six charts.
    ///
    /// A file that fails to write is logged and skipped so a partial failure
    /// does not erase the results already computed; the error returned at the
    /// end makes the run exit non-zero. Chart problems are warnings only.
    pub fn write_all(
        &self,
        cleaned: &mut DataFrame,
        aggregates: &mut AggregateSet,
    ) -> Result<(), SinkError> {
        let mut failed = 0usize;
        {
            let tables: [(&str, &mut DataFrame); 10] = [
                ("cleaned_data.csv", cleaned),
                (
                    "repeat_vs_nonrepeat_sales.csv",
                    &mut aggregates.repeat_vs_nonrepeat_sales,
                ),
                ("gender_sales.csv", &mut aggregates.gender_sales),
                ("category_ratings.csv", &mut aggregates.category_ratings),
                ("discount_impact.csv", &mut aggregates.discount_impact),
                ("age_group_sales.csv", &mut aggregates.age_group_sales),
                (
                    "top_products_by_category.csv",
                    &mut aggregates.top_products_by_category,
                ),
                ("city_revenue.csv", &mut aggregates.city_revenue),
                ("weekday_sales.csv", &mut aggregates.weekday_sales),
                (
                    "daily_sales_by_date_of_month.csv",
                    &mut aggregates.daily_sales_by_date_of_month,
                ),
            ];

            for (name, df) in tables {
                if let Err(e) = self.write_csv(name, df) {
                    error!("{e}");
                    failed += 1;
                }
            }
        }

        self.render_charts(aggregates);

        if failed > 0 {
            return Err(SinkError::Partial { failed });
        }
        Ok(())
    }

    /// Write one table as CSV with a header row.
    pub fn write_csv(&self, name: &str, df: &mut DataFrame) -> Result<(), SinkError> {
        let path = self.dir.join(name);
        let mut file = File::create(&path).map_err(|source| SinkError::Io {
            path: path.display().to_string(),
            source,
        })?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|source| SinkError::Csv {
                path: path.display().to_string(),
                source,
            })?;
        Ok(())
    }

    fn render_charts(&self, aggregates: &AggregateSet) {
        self.bar(
            "plot_repeat_vs_nonrepeat.png",
            "Repeat vs Non-Repeat Sales",
            &aggregates.repeat_vs_nonrepeat_sales,
            "repeat_customer",
            "total_sales",
            None,
            DEFAULT_BLUE,
        );
        self.bar(
            "plot_gender_sales.png",
            "Gender-wise Sales",
            &aggregates.gender_sales,
            "gender",
            "total_sales",
            None,
            ORANGE,
        );
        self.bar(
            "plot_discount_impact.png",
            "Discount Impact",
            &aggregates.discount_impact,
            "discount_applied",
            "total_sales",
            None,
            GREEN,
        );
        self.bar(
            "plot_age_group_sales.png",
            "Age Group Sales",
            &aggregates.age_group_sales,
            "age_group",
            "total_sales",
            Some(&AGE_GROUP_LABELS[..]),
            PURPLE,
        );
        self.bar(
            "plot_weekday_sales.png",
            "Sales by Weekday",
            &aggregates.weekday_sales,
            "weekday",
            "Purchase_Amount",
            Some(&WEEKDAY_ORDER[..]),
            SKY_BLUE,
        );
        self.daily_line(
            "plot_daily_sales.png",
            "Sales by Day of Month",
            &aggregates.daily_sales_by_date_of_month,
        );
    }

    fn bar(
        &self,
        name: &str,
        title: &str,
        df: &DataFrame,
        key: &str,
        value: &str,
        order: Option<&[&str]>,
        color: plotters::style::RGBColor,
    ) {
        let (mut labels, mut values) = match Self::bar_series(df, key, value) {
            Ok(series) => series,
            Err(e) => {
                warn!("Skipping chart '{name}': {e}");
                return;
            }
        };
        if let Some(order) = order {
            (labels, values) = Self::reorder(order, labels, values);
        }
        if labels.is_empty() {
            warn!("Skipping chart '{name}': table is empty");
            return;
        }
        let path = self.dir.join(name);
        if let Err(e) = ChartRenderer::bar_chart(&path, title, &labels, &values, color) {
            warn!("{e}");
        }
    }

    fn daily_line(&self, name: &str, title: &str, df: &DataFrame) {
        let points = match Self::line_series(df) {
            Ok(points) => points,
            Err(e) => {
                warn!("Skipping chart '{name}': {e}");
                return;
            }
        };
        if points.is_empty() {
            warn!("Skipping chart '{name}': table is empty");
            return;
        }
        let path = self.dir.join(name);
        if let Err(e) = ChartRenderer::line_chart(&path, title, &points, DEFAULT_BLUE) {
            warn!("{e}");
        }
    }

    fn bar_series(
        df: &DataFrame,
        key: &str,
        value: &str,
    ) -> Result<(Vec<String>, Vec<f64>), SinkError> {
        let keys = df.column(key)?.as_materialized_series().str()?.clone();
        let values = df.column(value)?.as_materialized_series().f64()?.clone();
        let mut labels = Vec::with_capacity(df.height());
        let mut sums = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(k), Some(v)) = (keys.get(i), values.get(i)) {
                labels.push(k.to_string());
                sums.push(v);
            }
        }
        Ok((labels, sums))
    }

    fn line_series(df: &DataFrame) -> Result<Vec<(i64, f64)>, SinkError> {
        let days = df.column("day_of_month")?.as_materialized_series().i64()?.clone();
        let values = df.column("total_sales")?.as_materialized_series().f64()?.clone();
        let mut points = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(d), Some(v)) = (days.get(i), values.get(i)) {
                points.push((d, v));
            }
        }
        Ok(points)
    }

    /// Keep only the labels named in `order`, in that order.
    fn reorder(
        order: &[&str],
        labels: Vec<String>,
        values: Vec<f64>,
    ) -> (Vec<String>, Vec<f64>) {
        let mut out_labels = Vec::with_capacity(labels.len());
        let mut out_values = Vec::with_capacity(values.len());
        for &wanted in order {
            if let Some(pos) = labels.iter().position(|l| l == wanted) {
                out_labels.push(labels[pos].clone());
                out_values.push(values[pos]);
            }
        }
        (out_labels, out_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path()).unwrap();
        let mut df = df!(
            "gender" => &["M", "F"],
            "total_sales" => &[100.0f64, 50.0],
        )
        .unwrap();
        sink.write_csv("gender_sales.csv", &mut df).unwrap();

        let content = fs::read_to_string(dir.path().join("gender_sales.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "gender,total_sales");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_table_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputSink::new(dir.path()).unwrap();
        let mut df = DataFrame::new(vec![
            Column::new("gender".into(), Vec::<String>::new()),
            Column::new("total_sales".into(), Vec::<f64>::new()),
        ])
        .unwrap();
        sink.write_csv("gender_sales.csv", &mut df).unwrap();

        let content = fs::read_to_string(dir.path().join("gender_sales.csv")).unwrap();
        assert_eq!(content.trim_end(), "gender,total_sales");
    }

    #[test]
    fn existing_directory_contents_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), "x").unwrap();
        let _sink = OutputSink::new(dir.path()).unwrap();
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn reorder_filters_and_orders() {
        let (labels, values) = OutputSink::reorder(
            &["Monday", "Tuesday", "Wednesday"],
            vec!["Tuesday".to_string(), "Monday".to_string()],
            vec![50.0, 100.0],
        );
        assert_eq!(labels, vec!["Monday", "Tuesday"]);
        assert_eq!(values, vec![100.0, 50.0]);
    }
}
