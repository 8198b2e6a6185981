//! CarbonScope - Country CO2 Emissions Cleaning Pipeline & Dashboard
//!
//! Two entry points share this library: the `clean_data` batch job turns the
//! raw Latin-1 export into a canonical cleaned CSV, and the `carbonscope`
//! binary serves an interactive dashboard over that file.

pub mod charts;
pub mod data;
pub mod gui;
pub mod views;
