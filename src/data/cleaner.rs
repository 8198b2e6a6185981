//! Cleaning Pipeline Module
//! Rename, coerce and deduplicate the raw table, then write the cleaned CSV.
//! The transform steps are pure DataFrame -> DataFrame functions; only
//! `save_cleaned` touches the filesystem.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Raw header -> canonical snake_case name.
pub const COLUMN_RENAMES: [(&str, &str); 9] = [
    ("Country", "country"),
    ("Code", "code"),
    ("Calling Code", "calling_code"),
    ("Year", "year"),
    ("CO2 emission (Tons)", "co2_tons"),
    ("Population(2022)", "population_2022"),
    ("Area", "area_km2"),
    ("% of World", "pct_world"),
    ("Density(km2)", "density_km2"),
];

/// Full in-memory cleaning pass: rename -> coerce -> dedup.
pub fn clean(df: DataFrame) -> Result<DataFrame, CleanError> {
    let df = rename_columns(df)?;
    let df = coerce_numeric_columns(df)?;
    drop_duplicate_country_years(df)
}

/// Rename known raw headers to their canonical names. Columns outside the
/// mapping pass through unchanged; a mapped column that is absent is skipped
/// here and reported by whichever downstream step needs it.
pub fn rename_columns(mut df: DataFrame) -> Result<DataFrame, CleanError> {
    for (raw, canonical) in COLUMN_RENAMES {
        if df.get_column_names().iter().any(|name| name.as_str() == raw) {
            df.rename(raw, canonical.into())?;
        }
    }
    Ok(df)
}

/// Coerce the two string-encoded numeric columns: `pct_world` ("NN%") and
/// `density_km2` ("NN/km²"). Values that do not parse become null.
pub fn coerce_numeric_columns(df: DataFrame) -> Result<DataFrame, CleanError> {
    let df = replace_with_parsed(df, "pct_world", "%")?;
    replace_with_parsed(df, "density_km2", "/km²")
}

/// Parse a numeric field with an optional trailing unit marker. Anything
/// that does not parse as a float maps to `None`.
fn parse_suffixed(raw: &str, suffix: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(suffix).unwrap_or(trimmed);
    trimmed.trim().parse::<f64>().ok()
}

fn replace_with_parsed(
    mut df: DataFrame,
    name: &str,
    suffix: &str,
) -> Result<DataFrame, CleanError> {
    let parsed: Vec<Option<f64>> = {
        let column = df.column(name)?;
        (0..column.len())
            .map(|i| {
                let value = column.get(i).ok()?;
                if value.is_null() {
                    return None;
                }
                // AnyValue renders strings quoted; numeric values render bare
                // and parse straight back.
                let text = value.to_string();
                parse_suffixed(text.trim_matches('"'), suffix)
            })
            .collect()
    };

    df.with_column(Column::new(name.into(), parsed))?;
    Ok(df)
}

/// Drop rows that repeat a (country, year) pair, keeping the first
/// occurrence in input order. Idempotent.
pub fn drop_duplicate_country_years(df: DataFrame) -> Result<DataFrame, CleanError> {
    let mask = {
        let country = df.column("country")?;
        let year = df.column("year")?;
        let mut seen: HashSet<(String, String)> = HashSet::new();

        let keep: Vec<bool> = (0..df.height())
            .map(|i| {
                let key = (row_key(country.get(i)), row_key(year.get(i)));
                seen.insert(key)
            })
            .collect();
        BooleanChunked::from_slice("keep".into(), &keep)
    };

    Ok(df.filter(&mask)?)
}

fn row_key(value: PolarsResult<AnyValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the cleaned table as UTF-8 CSV with a header row and no index
/// column. The destination directory must already exist.
pub fn save_cleaned(df: &DataFrame, path: impl AsRef<Path>) -> Result<(), CleanError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| CleanError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut out = df.clone();
    CsvWriter::new(file).finish(&mut out)?;

    tracing::debug!(rows = out.height(), path = %path.display(), "cleaned dataset written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_maps_known_headers_and_passes_others_through() {
        let df = DataFrame::new(vec![
            Column::new("Country".into(), vec!["US"]),
            Column::new("Code".into(), vec!["US"]),
            Column::new("Calling Code".into(), vec!["1"]),
            Column::new("Year".into(), vec![2020_i64]),
            Column::new("CO2 emission (Tons)".into(), vec![100.0_f64]),
            Column::new("Population(2022)".into(), vec![331_000_000_i64]),
            Column::new("Area".into(), vec![9_833_517_i64]),
            Column::new("% of World".into(), vec!["6.1%"]),
            Column::new("Density(km2)".into(), vec!["36/km²"]),
            Column::new("Extra".into(), vec!["kept"]),
        ])
        .expect("frame");

        let renamed = rename_columns(df).expect("rename");
        let names: Vec<&str> = renamed
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "country",
                "code",
                "calling_code",
                "year",
                "co2_tons",
                "population_2022",
                "area_km2",
                "pct_world",
                "density_km2",
                "Extra",
            ]
        );
    }

    #[test]
    fn rename_skips_absent_mapped_columns() {
        let df = DataFrame::new(vec![Column::new("Country".into(), vec!["US"])]).expect("frame");
        let renamed = rename_columns(df).expect("rename");
        assert_eq!(renamed.get_column_names()[0].as_str(), "country");
        assert_eq!(renamed.width(), 1);
    }

    #[test]
    fn coercion_downgrades_malformed_values_to_null() {
        let df = DataFrame::new(vec![
            Column::new("pct_world".into(), vec!["45%", "N/A", "", "12.5%"]),
            Column::new("density_km2".into(), vec!["102/km²", "bad", "7/km²", ""]),
        ])
        .expect("frame");

        let coerced = coerce_numeric_columns(df).expect("coerce");

        let pct: Vec<Option<f64>> = coerced
            .column("pct_world")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(pct, vec![Some(45.0), None, None, Some(12.5)]);

        let density: Vec<Option<f64>> = coerced
            .column("density_km2")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(density, vec![Some(102.0), None, Some(7.0), None]);
    }

    #[test]
    fn coercion_preserves_already_numeric_values() {
        let df = DataFrame::new(vec![
            Column::new("pct_world".into(), vec![Some(3.5_f64), None]),
            Column::new("density_km2".into(), vec![Some(12.0_f64), None]),
        ])
        .expect("frame");

        let coerced = coerce_numeric_columns(df).expect("coerce");
        let pct: Vec<Option<f64>> = coerced
            .column("pct_world")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(pct, vec![Some(3.5), None]);
    }

    #[test]
    fn coercion_fails_fast_when_a_canonical_column_is_absent() {
        let df = DataFrame::new(vec![Column::new("pct_world".into(), vec!["45%"])]).expect("frame");
        assert!(coerce_numeric_columns(df).is_err());
    }

    #[test]
    fn dedup_keeps_first_occurrence_and_is_idempotent() {
        let df = DataFrame::new(vec![
            Column::new("country".into(), vec!["US", "US", "FR"]),
            Column::new("year".into(), vec![2020_i64, 2020, 2020]),
            Column::new("code".into(), vec!["A", "B", "C"]),
        ])
        .expect("frame");

        let once = drop_duplicate_country_years(df).expect("dedup");
        assert_eq!(once.height(), 2);

        let codes: Vec<String> = (0..once.height())
            .map(|i| {
                once.column("code")
                    .unwrap()
                    .get(i)
                    .unwrap()
                    .to_string()
                    .trim_matches('"')
                    .to_string()
            })
            .collect();
        assert_eq!(codes, vec!["A", "C"]);

        let twice = drop_duplicate_country_years(once.clone()).expect("dedup twice");
        assert!(once.equals(&twice));
    }

    #[test]
    fn round_trip_preserves_keys_and_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("co2_cleaned.csv");

        let df = DataFrame::new(vec![
            Column::new("country".into(), vec!["United States", "France"]),
            Column::new("year".into(), vec![2020_i64, 2020]),
            Column::new("co2_tons".into(), vec![150.5_f64, 40.25]),
            Column::new("pct_world".into(), vec![Some(45.0_f64), None]),
        ])
        .expect("frame");

        save_cleaned(&df, &path).expect("save");

        let reloaded = CsvReadOptions::default()
            .with_infer_schema_length(Some(100))
            .into_reader_with_file_handle(File::open(&path).expect("open"))
            .finish()
            .expect("reload");

        assert_eq!(reloaded.height(), df.height());
        let names: Vec<&str> = reloaded
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["country", "year", "co2_tons", "pct_world"]);

        for column in ["co2_tons", "pct_world"] {
            let original: Vec<Option<f64>> =
                df.column(column).unwrap().f64().unwrap().into_iter().collect();
            let back: Vec<Option<f64>> = reloaded
                .column(column)
                .unwrap()
                .f64()
                .unwrap()
                .into_iter()
                .collect();
            for (a, b) in original.iter().zip(back.iter()) {
                match (a, b) {
                    (Some(a), Some(b)) => assert!((a - b).abs() < 1e-9),
                    (a, b) => assert_eq!(a, b),
                }
            }
        }
    }

    #[test]
    fn save_fails_without_destination_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("out.csv");

        let df = DataFrame::new(vec![Column::new("country".into(), vec!["US"])]).expect("frame");
        let err = save_cleaned(&df, &path).expect_err("save should fail");
        assert!(matches!(err, CleanError::Io { .. }));
    }
}
