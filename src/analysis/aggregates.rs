//! Aggregation Module
//! Computes the nine derived tables from the cleaned purchase-event frame.

use crate::schema::{derived, input, SchemaError};
use indexmap::IndexMap;
use polars::prelude::*;
use std::cmp::Ordering;
use thiserror::Error;

/// Products kept per category in the top-products table.
const TOP_PRODUCTS_PER_CATEGORY: usize = 3;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// The nine output tables, each with the column names it is written with.
#[derive(Debug)]
pub struct AggregateSet {
    pub repeat_vs_nonrepeat_sales: DataFrame,
    pub gender_sales: DataFrame,
    pub category_ratings: DataFrame,
    pub discount_impact: DataFrame,
    pub age_group_sales: DataFrame,
    pub top_products_by_category: DataFrame,
    pub city_revenue: DataFrame,
    pub weekday_sales: DataFrame,
    pub daily_sales_by_date_of_month: DataFrame,
}

/// Computes every aggregate table in one pass over the extracted columns.
pub struct Aggregator;

impl Aggregator {
    /// Compute the nine tables from a cleaned frame carrying the derived
    /// columns. Group keys are emitted in first-occurrence order; the daily
    /// table is sorted by day of month.
    pub fn compute(df: &DataFrame) -> Result<AggregateSet, AnalysisError> {
        let repeat = Self::text_column(df, input::REPEAT_CUSTOMER)?;
        let gender = Self::text_column(df, input::GENDER)?;
        let category = Self::text_column(df, input::CATEGORY)?;
        let product = Self::text_column(df, input::PRODUCT_NAME)?;
        let city = Self::text_column(df, input::CITY)?;
        let discount = Self::text_column(df, input::DISCOUNT_APPLIED)?;
        let age_group = Self::text_column(df, derived::AGE_GROUP)?;
        let weekday = Self::text_column(df, derived::WEEKDAY)?;
        let day = Self::int_column(df, derived::DAY_OF_MONTH)?;
        let amount = Self::float_column(df, input::PURCHASE_AMOUNT)?;
        let rating = Self::float_column(df, input::RATING)?;

        Ok(AggregateSet {
            repeat_vs_nonrepeat_sales: Self::sum_table(
                &repeat,
                &amount,
                "repeat_customer",
                "total_sales",
            )?,
            gender_sales: Self::sum_table(&gender, &amount, "gender", "total_sales")?,
            category_ratings: Self::mean_table(&category, &rating, "category", "average_rating")?,
            discount_impact: Self::sum_table(
                &discount,
                &amount,
                "discount_applied",
                "total_sales",
            )?,
            age_group_sales: Self::sum_table(&age_group, &amount, "age_group", "total_sales")?,
            top_products_by_category: Self::top_products(&category, &product, &amount)?,
            city_revenue: Self::sum_table(&city, &amount, "City", "Purchase_Amount")?,
            weekday_sales: Self::sum_table(&weekday, &amount, "weekday", "Purchase_Amount")?,
            daily_sales_by_date_of_month: Self::daily_sales(&day, &amount)?,
        })
    }

    /// Sum of Purchase_Amount per key, keys in first-occurrence order.
    fn sum_table(
        keys: &[String],
        amounts: &[f64],
        key_name: &str,
        value_name: &str,
    ) -> Result<DataFrame, AnalysisError> {
        let mut sums: IndexMap<String, f64> = IndexMap::new();
        for (key, &amount) in keys.iter().zip(amounts) {
            *sums.entry(key.clone()).or_insert(0.0) += amount;
        }

        let (out_keys, out_values): (Vec<String>, Vec<f64>) = sums.into_iter().unzip();
        Ok(DataFrame::new(vec![
            Column::new(key_name.into(), out_keys),
            Column::new(value_name.into(), out_values),
        ])?)
    }

    /// Arithmetic mean per key, keys in first-occurrence order.
    fn mean_table(
        keys: &[String],
        values: &[f64],
        key_name: &str,
        value_name: &str,
    ) -> Result<DataFrame, AnalysisError> {
        let mut acc: IndexMap<String, (f64, usize)> = IndexMap::new();
        for (key, &value) in keys.iter().zip(values) {
            let slot = acc.entry(key.clone()).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }

        let mut out_keys = Vec::with_capacity(acc.len());
        let mut means = Vec::with_capacity(acc.len());
        for (key, (sum, count)) in acc {
            out_keys.push(key);
            means.push(sum / count as f64);
        }
        Ok(DataFrame::new(vec![
            Column::new(key_name.into(), out_keys),
            Column::new(value_name.into(), means),
        ])?)
    }

    /// Top three products per category by summed Purchase_Amount.
    ///
    /// Sorted by Category ascending, then sum descending, with Product_Name
    /// ascending as the tie-break.
    fn top_products(
        categories: &[String],
        products: &[String],
        amounts: &[f64],
    ) -> Result<DataFrame, AnalysisError> {
        let mut sums: IndexMap<(String, String), f64> = IndexMap::new();
        for ((category, product), &amount) in categories.iter().zip(products).zip(amounts) {
            *sums
                .entry((category.clone(), product.clone()))
                .or_insert(0.0) += amount;
        }

        let mut rows: Vec<(&str, &str, f64)> = sums
            .iter()
            .map(|((category, product), &sum)| (category.as_str(), product.as_str(), sum))
            .collect();
        rows.sort_by(|a, b| {
            a.0.cmp(b.0)
                .then_with(|| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal))
                .then_with(|| a.1.cmp(b.1))
        });

        let mut out_categories: Vec<String> = Vec::new();
        let mut out_products: Vec<String> = Vec::new();
        let mut out_sums: Vec<f64> = Vec::new();
        let mut current: Option<&str> = None;
        let mut taken = 0usize;
        for (category, product, sum) in rows {
            if current != Some(category) {
                current = Some(category);
                taken = 0;
            }
            if taken < TOP_PRODUCTS_PER_CATEGORY {
                out_categories.push(category.to_string());
                out_products.push(product.to_string());
                out_sums.push(sum);
                taken += 1;
            }
        }

        Ok(DataFrame::new(vec![
            Column::new("Category".into(), out_categories),
            Column::new("Product_Name".into(), out_products),
            Column::new("Purchase_Amount".into(), out_sums),
        ])?)
    }

    /// Sum of Purchase_Amount per day of month, ascending 1..31.
    fn daily_sales(days: &[i64], amounts: &[f64]) -> Result<DataFrame, AnalysisError> {
        let mut sums: IndexMap<i64, f64> = IndexMap::new();
        for (&day, &amount) in days.iter().zip(amounts) {
            *sums.entry(day).or_insert(0.0) += amount;
        }
        sums.sort_keys();

        let (out_days, out_values): (Vec<i64>, Vec<f64>) = sums.into_iter().unzip();
        Ok(DataFrame::new(vec![
            Column::new("day_of_month".into(), out_days),
            Column::new("total_sales".into(), out_values),
        ])?)
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, AnalysisError> {
        df.column(name)
            .map_err(|_| AnalysisError::Schema(SchemaError(name.to_string())))
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, AnalysisError> {
        let series = Self::column(df, name)?.as_materialized_series();
        Ok((0..series.len())
            .map(|i| {
                series
                    .get(i)
                    .map(|v| v.to_string().trim_matches('"').to_string())
                    .unwrap_or_default()
            })
            .collect())
    }

    fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, AnalysisError> {
        let column = Self::column(df, name)?.cast(&DataType::Float64)?;
        let values = column.as_materialized_series().f64()?;
        Ok((0..values.len())
            .map(|i| values.get(i).unwrap_or(0.0))
            .collect())
    }

    fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>, AnalysisError> {
        let column = Self::column(df, name)?.cast(&DataType::Int64)?;
        let values = column.as_materialized_series().i64()?;
        Ok((0..values.len()).map(|i| values.get(i).unwrap_or(0)).collect())
    }
}
