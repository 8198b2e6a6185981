//! Charts module - Chart rendering

mod plotter;

pub use plotter::{ChartPlotter, COUNTRY_TREND_COLOR, GLOBAL_TREND_COLOR};
