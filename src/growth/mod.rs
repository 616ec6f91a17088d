//! Growth charting — month-offset arithmetic, WHO reference tables, series
//! assembly from snapshot history, and PDF rendering.

pub mod age;
pub mod chart;
pub mod pdf;
pub mod reference;

pub use age::age_in_months;
pub use chart::{build_series, GrowthPoint, GrowthSeries};
pub use reference::{Measure, PercentileBand};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No snapshots recorded for {name}")]
    NoSnapshots { name: String },

    #[error("No {measure} measurements recorded for {name}")]
    NoMeasurements { name: String, measure: &'static str },

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}
