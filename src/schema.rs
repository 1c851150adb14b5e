//! Column-name constants for the purchase-event table.
//! Single source of truth for every stage of the pipeline.

use polars::prelude::DataFrame;
use thiserror::Error;

// ── Input columns ───────────────────────────────────────────────────────────
pub mod input {
    pub const CUSTOMER_ID: &str = "Customer_ID";
    pub const AGE: &str = "Age";
    pub const GENDER: &str = "Gender";
    pub const CITY: &str = "City";
    pub const CATEGORY: &str = "Category";
    pub const PRODUCT_NAME: &str = "Product_Name";
    pub const PURCHASE_DATE: &str = "Purchase_Date";
    pub const PURCHASE_AMOUNT: &str = "Purchase_Amount";
    pub const REPEAT_CUSTOMER: &str = "Repeat_Customer";
    pub const DISCOUNT_APPLIED: &str = "Discount_Applied";
    pub const RATING: &str = "Rating";

    pub const REQUIRED: [&str; 11] = [
        CUSTOMER_ID,
        AGE,
        GENDER,
        CITY,
        CATEGORY,
        PRODUCT_NAME,
        PURCHASE_DATE,
        PURCHASE_AMOUNT,
        REPEAT_CUSTOMER,
        DISCOUNT_APPLIED,
        RATING,
    ];
}

// ── Derived columns ─────────────────────────────────────────────────────────
pub mod derived {
    pub const AGE_GROUP: &str = "age_group";
    pub const WEEKDAY: &str = "weekday";
    pub const DAY_OF_MONTH: &str = "day_of_month";
}

#[derive(Error, Debug)]
#[error("Required column '{0}' is missing from the input")]
pub struct SchemaError(pub String);

/// Check that every required input column is present.
pub fn validate_columns(df: &DataFrame) -> Result<(), SchemaError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for required in input::REQUIRED {
        if !names.iter().any(|n| n == required) {
            return Err(SchemaError(required.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn accepts_full_schema() {
        let columns: Vec<Column> = input::REQUIRED
            .iter()
            .map(|name| Column::new((*name).into(), Vec::<String>::new()))
            .collect();
        let df = DataFrame::new(columns).unwrap();
        assert!(validate_columns(&df).is_ok());
    }

    #[test]
    fn reports_first_missing_column() {
        let df = df!(
            "Customer_ID" => &["C1"],
            "Age" => &[25i64],
        )
        .unwrap();
        let err = validate_columns(&df).unwrap_err();
        assert_eq!(err.0, "Gender");
    }

    #[test]
    fn extra_columns_are_fine() {
        let mut columns: Vec<Column> = input::REQUIRED
            .iter()
            .map(|name| Column::new((*name).into(), Vec::<String>::new()))
            .collect();
        columns.push(Column::new("Store_ID".into(), Vec::<String>::new()));
        let df = DataFrame::new(columns).unwrap();
        assert!(validate_columns(&df).is_ok());
    }
}
