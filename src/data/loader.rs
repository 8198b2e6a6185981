//! Raw CSV Loader Module
//! Reads the Latin-1 encoded source export into a Polars DataFrame.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Read the raw emissions export into a DataFrame.
///
/// The source file is Latin-1 encoded (the `Density(km2)` column carries `²`
/// bytes that are not valid UTF-8), so the bytes are decoded before parsing.
/// Schema inference runs over the whole file; the dataset is one row per
/// country-year and stays small.
pub fn load_raw_csv(path: impl AsRef<Path>) -> Result<DataFrame, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    // The WHATWG "latin1" label resolves to windows-1252; every byte decodes.
    let (text, _, _) = WINDOWS_1252.decode(&bytes);

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(10_000))
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()?;

    tracing::debug!(rows = df.height(), cols = df.width(), "raw dataset loaded");
    Ok(df)
}

/// Log an inspection summary for a freshly loaded frame: shape, dtypes and
/// per-column null counts.
pub fn log_inspection(df: &DataFrame) {
    tracing::info!(rows = df.height(), cols = df.width(), "raw shape");
    for column in df.get_columns() {
        tracing::info!(
            column = column.name().as_str(),
            dtype = %column.dtype(),
            nulls = column.null_count(),
            "raw column"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_latin1_encoded_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("raw.csv");

        let mut bytes = b"Country,Density(km2)\nChile,26/km".to_vec();
        bytes.push(0xB2); // '²' in Latin-1
        bytes.push(b'\n');
        fs::write(&path, bytes).expect("write raw file");

        let df = load_raw_csv(&path).expect("load");
        assert_eq!(df.height(), 1);

        let density = df
            .column("Density(km2)")
            .expect("density column")
            .get(0)
            .expect("first row")
            .to_string();
        assert_eq!(density.trim_matches('"'), "26/km²");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_raw_csv("does/not/exist.csv").expect_err("load should fail");
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
