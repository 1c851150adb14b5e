//! Data module - CSV loading, cleaning and feature derivation

mod cleaner;
mod features;
mod loader;

pub use cleaner::{CleanerError, DataCleaner};
pub use features::{FeatureBuilder, FeatureError, AGE_GROUP_LABELS, WEEKDAY_ORDER};
pub use loader::{DataLoader, LoaderError};
