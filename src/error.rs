//! Error taxonomy
//!
//! Load failures are fatal and abort before anything is rendered. Empty
//! filter results are not errors; they surface as `Panel::Empty`.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("input file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unparseable timestamp '{value}' in {path}")]
    Timestamp { path: PathBuf, value: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}
