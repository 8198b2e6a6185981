//! Derived Views Module
//! Pure computations over the cleaned table for one dashboard selection.

use polars::prelude::*;

/// Ranking mode for the top-emitters table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Rank by absolute annual emissions.
    TotalEmissions,
    /// Rank by annual emissions per person.
    PerCapita,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::TotalEmissions
    }
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::TotalEmissions => "Total Emissions",
            ViewMode::PerCapita => "Per Capita",
        }
    }

    /// Column header for the ranking value.
    pub fn value_label(&self) -> &'static str {
        match self {
            ViewMode::TotalEmissions => "CO2 (tons)",
            ViewMode::PerCapita => "CO2 per Capita",
        }
    }
}

/// Ranking depth of the top-emitters table.
pub const TOP_EMITTERS: usize = 10;

/// Countries below this population are left out of the bubble chart.
pub const MIN_BUBBLE_POPULATION: f64 = 1_000_000.0;

/// Snapshot metrics for one selected year.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub year: i64,
    pub country: String,
    pub global_total: f64,
    pub country_total: f64,
}

impl Snapshot {
    /// Country share of the selected-year global sum, as a percentage.
    /// None when the country value is non-positive.
    pub fn share(&self) -> Option<f64> {
        if self.country_total > 0.0 {
            Some(self.country_total / self.global_total * 100.0)
        } else {
            None
        }
    }

    pub fn share_label(&self) -> String {
        match self.share() {
            Some(share) => format!("{:.2}%", share),
            None => "N/A".to_string(),
        }
    }
}

/// One row of the top-emitters table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCountry {
    pub country: String,
    pub value: f64,
}

/// One bubble-chart marker.
#[derive(Debug, Clone)]
pub struct BubblePoint {
    pub country: String,
    pub population: f64,
    pub area_km2: f64,
    pub annual_co2: f64,
}

/// Computes the derived dashboard views. Every function is a pure read of
/// the cleaned table; missing values degrade results, never abort them.
pub struct Metrics;

impl Metrics {
    /// Snapshot metrics for the selected year and country. A country with no
    /// row in that year yields a zero total.
    pub fn snapshot(df: &DataFrame, year: i64, country: &str) -> Snapshot {
        let year_rows = Self::rows_for_year(df, year);
        let global_total = Self::sum_column(&year_rows, "annual_co2");

        let country_rows = year_rows
            .lazy()
            .filter(col("country").eq(lit(country)))
            .collect()
            .unwrap_or_default();
        let country_total = Self::sum_column(&country_rows, "annual_co2");

        Snapshot {
            year,
            country: country.to_string(),
            global_total,
            country_total,
        }
    }

    /// (year, annual_co2) points for one country, ascending by year. Rows
    /// with a missing delta are skipped.
    pub fn country_trend(df: &DataFrame, country: &str) -> Vec<[f64; 2]> {
        let rows = df
            .clone()
            .lazy()
            .filter(col("country").eq(lit(country)))
            .select([col("year"), col("annual_co2")])
            .collect()
            .unwrap_or_default();
        Self::year_value_points(&rows)
    }

    /// Annual total summed across all countries, per year ascending.
    pub fn global_trend(df: &DataFrame) -> Vec<[f64; 2]> {
        let rows = df
            .clone()
            .lazy()
            .group_by([col("year")])
            .agg([col("annual_co2").sum()])
            .sort(["year"], SortMultipleOptions::default())
            .collect()
            .unwrap_or_default();
        Self::year_value_points(&rows)
    }

    /// The ten largest emitters for the selected year, descending. Stable
    /// for ties; rows missing the active metric are excluded.
    pub fn top_emitters(df: &DataFrame, year: i64, mode: ViewMode) -> Vec<RankedCountry> {
        let rows = Self::rows_for_year(df, year);
        let countries = Self::string_values(&rows, "country");
        let annual = Self::float_values(&rows, "annual_co2");
        let population = Self::float_values(&rows, "population_2022");

        let mut ranked: Vec<RankedCountry> = countries
            .into_iter()
            .zip(annual)
            .zip(population)
            .filter_map(|((country, annual), population)| {
                let country = country?;
                let annual = annual.filter(|v| !v.is_nan())?;
                let value = match mode {
                    ViewMode::TotalEmissions => annual,
                    ViewMode::PerCapita => {
                        let population = population.filter(|p| *p > 0.0)?;
                        annual / population
                    }
                };
                Some(RankedCountry { country, value })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(TOP_EMITTERS);
        ranked
    }

    /// Bubble-chart points for the selected year: countries above the
    /// population floor with population, area and annual delta all present.
    pub fn bubble_points(df: &DataFrame, year: i64) -> Vec<BubblePoint> {
        let rows = Self::rows_for_year(df, year);
        let countries = Self::string_values(&rows, "country");
        let population = Self::float_values(&rows, "population_2022");
        let area = Self::float_values(&rows, "area_km2");
        let annual = Self::float_values(&rows, "annual_co2");

        countries
            .into_iter()
            .zip(population)
            .zip(area)
            .zip(annual)
            .filter_map(|(((country, population), area), annual)| {
                let country = country?;
                let population = population.filter(|p| !p.is_nan())?;
                let area_km2 = area.filter(|a| !a.is_nan())?;
                let annual_co2 = annual.filter(|v| !v.is_nan())?;
                (population > MIN_BUBBLE_POPULATION).then_some(BubblePoint {
                    country,
                    population,
                    area_km2,
                    annual_co2,
                })
            })
            .collect()
    }

    fn sum_column(df: &DataFrame, name: &str) -> f64 {
        Self::float_values(df, name)
            .into_iter()
            .flatten()
            .filter(|value| !value.is_nan())
            .sum()
    }

    fn rows_for_year(df: &DataFrame, year: i64) -> DataFrame {
        df.clone()
            .lazy()
            .filter(col("year").eq(lit(year)))
            .collect()
            .unwrap_or_default()
    }

    fn year_value_points(df: &DataFrame) -> Vec<[f64; 2]> {
        let years = Self::float_values(df, "year");
        let values = Self::float_values(df, "annual_co2");
        years
            .into_iter()
            .zip(values)
            .filter_map(|(year, value)| Some([year?, value?]))
            .filter(|point| !point[1].is_nan())
            .collect()
    }

    fn float_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .ok()
            .and_then(|col| col.cast(&DataType::Float64).ok())
            .and_then(|col| {
                col.f64()
                    .ok()
                    .map(|ca| ca.into_iter().collect::<Vec<Option<f64>>>())
            })
            .unwrap_or_default()
    }

    fn string_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .ok()
            .map(|col| {
                (0..col.len())
                    .map(|i| {
                        let value = col.get(i).ok()?;
                        if value.is_null() {
                            None
                        } else {
                            Some(value.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
