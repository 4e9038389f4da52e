use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure the generator can run into. All of them abort the run.
#[derive(Debug, Error)]
pub enum HolidayError {
    #[error("could not read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not decode configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write configuration {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("missing {field} for '{title}' in calendar '{calendar}'")]
    MissingField {
        calendar: String,
        title: String,
        field: &'static str,
    },

    #[error("invalid {field} for '{title}' in calendar '{calendar}': {reason}")]
    InvalidField {
        calendar: String,
        title: String,
        field: &'static str,
        reason: String,
    },

    #[error("year {year} is outside the supported range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("year range start {start} is after end {end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("date arithmetic overflowed while computing '{title}'")]
    DateOutOfRange { title: String },

    #[error("output directory {path} is not usable: {source}")]
    OutputPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write calendar {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type HolidayResult<T> = Result<T, HolidayError>;

/// Rejected textual value for an `offset` or `monthDay` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} (got '{value}')")]
pub struct FieldParseError {
    pub value: String,
    pub reason: &'static str,
}

impl FieldParseError {
    pub(crate) fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.to_string(),
            reason,
        }
    }
}
