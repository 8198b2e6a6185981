//! Data module - raw ingestion, cleaning and the dashboard dataset

mod cleaner;
mod dataset;
mod loader;

pub use cleaner::{
    clean, coerce_numeric_columns, drop_duplicate_country_years, rename_columns, save_cleaned,
    CleanError, COLUMN_RENAMES,
};
pub use dataset::{DatasetError, DatasetLoader, EmissionsTable, REQUIRED_COLUMNS};
pub use loader::{load_raw_csv, log_inspection, LoadError};

/// Fixed batch-job paths, relative to the repository root.
pub const RAW_DATA_PATH: &str = "data/raw/CO2 emission by countries.csv";
pub const CLEANED_DATA_PATH: &str = "data/processed/co2_cleaned.csv";
