//! Batch cleaning job: raw Latin-1 export -> canonical cleaned CSV.
//! Paths are fixed; the dataset is small enough to reprocess wholesale after
//! any failure.

use anyhow::{Context, Result};
use carbonscope::data::{self, CLEANED_DATA_PATH, RAW_DATA_PATH};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(input = RAW_DATA_PATH, "cleaning raw emissions dataset");

    let raw = data::load_raw_csv(RAW_DATA_PATH)
        .with_context(|| format!("loading raw dataset from {RAW_DATA_PATH}"))?;
    data::log_inspection(&raw);

    let cleaned = data::clean(raw).context("cleaning raw dataset")?;
    tracing::info!(rows = cleaned.height(), cols = cleaned.width(), "final shape");

    data::save_cleaned(&cleaned, CLEANED_DATA_PATH)
        .with_context(|| format!("writing cleaned dataset to {CLEANED_DATA_PATH}"))?;
    tracing::info!(output = CLEANED_DATA_PATH, "cleaned dataset written");

    Ok(())
}
