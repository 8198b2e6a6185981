//! Views module - derived dashboard views and formatting

mod format;
mod metrics;

pub use format::{format_compact, format_number};
pub use metrics::{
    BubblePoint, Metrics, RankedCountry, Snapshot, ViewMode, MIN_BUBBLE_POPULATION, TOP_EMITTERS,
};
