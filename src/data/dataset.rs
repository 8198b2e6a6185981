//! Cleaned Dataset Module
//! Loads the cleaned CSV for the dashboard, derives the annual delta column
//! and memoizes the resulting snapshot.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use polars::prelude::*;
use thiserror::Error;

/// Canonical columns the dashboard requires in the cleaned file.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "country",
    "code",
    "calling_code",
    "year",
    "co2_tons",
    "population_2022",
    "area_km2",
    "pct_world",
    "density_km2",
];

/// Preferred default country when present in the data.
const DEFAULT_COUNTRY: &str = "United States";

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Cleaned dataset is missing required columns: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
}

/// Immutable snapshot of the cleaned dataset: sorted by (country, year) with
/// the derived `annual_co2` column appended, plus the selection domains the
/// controls need.
#[derive(Debug)]
pub struct EmissionsTable {
    df: DataFrame,
    year_bounds: (i64, i64),
    countries: Vec<String>,
}

impl EmissionsTable {
    fn from_dataframe(df: DataFrame) -> Result<Self, DatasetError> {
        check_schema(&df)?;
        let df = df.sort(["country", "year"], SortMultipleOptions::default())?;
        let df = with_annual_delta(df)?;
        let year_bounds = year_bounds(&df)?;
        let countries = distinct_countries(&df);
        Ok(Self {
            df,
            year_bounds,
            countries,
        })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Observed (min, max) year.
    pub fn year_bounds(&self) -> (i64, i64) {
        self.year_bounds
    }

    /// Distinct country names, ascending.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Default dashboard country: "United States" when present, otherwise
    /// the first name alphabetically.
    pub fn default_country(&self) -> Option<&str> {
        self.countries
            .iter()
            .find(|country| country.as_str() == DEFAULT_COUNTRY)
            .or_else(|| self.countries.first())
            .map(String::as_str)
    }
}

/// Memoized loader for the cleaned dataset.
///
/// `load` parses the file once and keeps the snapshot for the process
/// lifetime; `reload` is the only invalidation. There is no file-change
/// detection.
pub struct DatasetLoader {
    path: PathBuf,
    snapshot: Option<Arc<EmissionsTable>>,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: None,
        }
    }

    pub fn load(&mut self) -> Result<Arc<EmissionsTable>, DatasetError> {
        if let Some(snapshot) = &self.snapshot {
            return Ok(Arc::clone(snapshot));
        }
        self.reload()
    }

    /// Discard the cached snapshot and re-read the file.
    pub fn reload(&mut self) -> Result<Arc<EmissionsTable>, DatasetError> {
        self.snapshot = None;
        let df = read_cleaned_csv(&self.path)?;
        let table = Arc::new(EmissionsTable::from_dataframe(df)?);
        tracing::info!(
            rows = table.dataframe().height(),
            countries = table.countries().len(),
            "cleaned dataset loaded"
        );
        self.snapshot = Some(Arc::clone(&table));
        Ok(table)
    }

    pub fn snapshot(&self) -> Option<&Arc<EmissionsTable>> {
        self.snapshot.as_ref()
    }
}

fn read_cleaned_csv(path: &Path) -> Result<DataFrame, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(10_000))
        .into_reader_with_file_handle(file)
        .finish()?;
    Ok(df)
}

fn check_schema(df: &DataFrame) -> Result<(), DatasetError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| {
            !df.get_column_names()
                .iter()
                .any(|name| name.as_str() == **required)
        })
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::SchemaMismatch { missing })
    }
}

/// Append the within-country first difference of `co2_tons`. Requires the
/// frame to be sorted by (country, year); the first row per country and any
/// row whose current or previous cumulative value is missing yield null.
fn with_annual_delta(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let deltas: Vec<Option<f64>> = {
        let country = df.column("country")?;
        let co2 = df.column("co2_tons")?.cast(&DataType::Float64)?;
        let co2 = co2.f64()?;

        let mut prev: Option<(String, Option<f64>)> = None;
        (0..df.height())
            .map(|i| {
                let name = country.get(i).map(|v| v.to_string()).unwrap_or_default();
                let current = co2.get(i).filter(|v| !v.is_nan());
                let delta = match &prev {
                    Some((prev_name, Some(prev_value))) if *prev_name == name => {
                        current.map(|value| value - *prev_value)
                    }
                    _ => None,
                };
                prev = Some((name, current));
                delta
            })
            .collect()
    };

    df.with_column(Column::new("annual_co2".into(), deltas))?;
    Ok(df)
}

fn year_bounds(df: &DataFrame) -> PolarsResult<(i64, i64)> {
    let years = df.column("year")?.cast(&DataType::Int64)?;
    let years = years.i64()?;
    Ok((years.min().unwrap_or(0), years.max().unwrap_or(0)))
}

fn distinct_countries(df: &DataFrame) -> Vec<String> {
    let mut names: Vec<String> = df
        .column("country")
        .ok()
        .and_then(|col| col.unique().ok())
        .map(|unique| {
            let series = unique.as_materialized_series();
            (0..series.len())
                .filter_map(|i| {
                    let val = series.get(i).ok()?;
                    if val.is_null() {
                        None
                    } else {
                        Some(val.to_string().trim_matches('"').to_string())
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_HEADER: &str =
        "country,code,calling_code,year,co2_tons,population_2022,area_km2,pct_world,density_km2";

    fn write_csv(path: &Path, rows: &[&str]) {
        let mut text = String::from(CSV_HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        std::fs::write(path, text).expect("write csv");
    }

    fn cleaned_frame(countries: &[&str], years: &[i64], co2: &[Option<f64>]) -> DataFrame {
        let n = countries.len();
        DataFrame::new(vec![
            Column::new(
                "country".into(),
                countries.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            ),
            Column::new("code".into(), vec!["XX".to_string(); n]),
            Column::new("calling_code".into(), vec!["1".to_string(); n]),
            Column::new("year".into(), years.to_vec()),
            Column::new("co2_tons".into(), co2.to_vec()),
            Column::new("population_2022".into(), vec![Some(1.0_f64); n]),
            Column::new("area_km2".into(), vec![Some(1.0_f64); n]),
            Column::new("pct_world".into(), vec![None::<f64>; n]),
            Column::new("density_km2".into(), vec![None::<f64>; n]),
        ])
        .expect("frame")
    }

    fn annual_column(table: &EmissionsTable) -> Vec<Option<f64>> {
        table
            .dataframe()
            .column("annual_co2")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn annual_delta_is_first_difference_within_country() {
        let df = cleaned_frame(
            &["United States", "United States", "United States", "France"],
            &[2019, 2020, 2021, 2020],
            &[Some(100.0), Some(150.0), Some(130.0), Some(40.0)],
        );

        let table = EmissionsTable::from_dataframe(df).expect("table");
        // France sorts first; the US rows follow in year order.
        assert_eq!(
            annual_column(&table),
            vec![None, None, Some(50.0), Some(-20.0)]
        );
    }

    #[test]
    fn annual_delta_sorts_years_before_differencing() {
        let df = cleaned_frame(
            &["United States", "United States", "United States"],
            &[2021, 2019, 2020],
            &[Some(130.0), Some(100.0), Some(150.0)],
        );

        let table = EmissionsTable::from_dataframe(df).expect("table");
        assert_eq!(annual_column(&table), vec![None, Some(50.0), Some(-20.0)]);
    }

    #[test]
    fn annual_delta_restarts_after_missing_cumulative_value() {
        let df = cleaned_frame(
            &["France", "France", "France"],
            &[2019, 2020, 2021],
            &[Some(10.0), None, Some(30.0)],
        );

        let table = EmissionsTable::from_dataframe(df).expect("table");
        assert_eq!(annual_column(&table), vec![None, None, None]);
    }

    #[test]
    fn schema_check_names_missing_columns() {
        let df = DataFrame::new(vec![
            Column::new("country".into(), vec!["US"]),
            Column::new("year".into(), vec![2020_i64]),
        ])
        .expect("frame");

        let err = EmissionsTable::from_dataframe(df).expect_err("schema check should fail");
        match err {
            DatasetError::SchemaMismatch { missing } => {
                assert!(missing.contains(&"co2_tons".to_string()));
                assert!(!missing.contains(&"country".to_string()));
            }
            other => panic!("expected SchemaMismatch, got {other}"),
        }
    }

    #[test]
    fn selection_domains_cover_years_and_countries() {
        let df = cleaned_frame(
            &["France", "United States", "France"],
            &[2019, 2020, 2021],
            &[Some(1.0), Some(2.0), Some(3.0)],
        );

        let table = EmissionsTable::from_dataframe(df).expect("table");
        assert_eq!(table.year_bounds(), (2019, 2021));
        let countries: Vec<&str> = table.countries().iter().map(String::as_str).collect();
        assert_eq!(countries, vec!["France", "United States"]);
        assert_eq!(table.default_country(), Some("United States"));
    }

    #[test]
    fn default_country_falls_back_to_first_alphabetical() {
        let df = cleaned_frame(&["Norway", "Chile"], &[2020, 2020], &[Some(1.0), Some(2.0)]);
        let table = EmissionsTable::from_dataframe(df).expect("table");
        assert_eq!(table.default_country(), Some("Chile"));
    }

    #[test]
    fn load_memoizes_until_explicit_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("co2_cleaned.csv");
        write_csv(&path, &["United States,US,1,2019,100,331000000,9833517,14.0,36"]);

        let mut loader = DatasetLoader::new(path.clone());
        let first = loader.load().expect("first load");
        assert_eq!(first.dataframe().height(), 1);

        write_csv(
            &path,
            &[
                "United States,US,1,2019,100,331000000,9833517,14.0,36",
                "France,FR,33,2019,50,67000000,643801,1.0,104",
            ],
        );

        let second = loader.load().expect("cached load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.dataframe().height(), 1);

        let reloaded = loader.reload().expect("reload");
        assert_eq!(reloaded.dataframe().height(), 2);
    }

    #[test]
    fn missing_cleaned_file_is_an_io_error() {
        let mut loader = DatasetLoader::new("does/not/exist.csv");
        let err = loader.load().expect_err("load should fail");
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
