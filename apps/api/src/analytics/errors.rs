use chrono::{DateTime, Utc};
use thiserror::Error;

/// Contract violations raised by the engine. These are caller bugs and
/// propagate instead of being absorbed into the report.
#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("reference time {0} is outside the supported calendar range")]
    InvalidNow(DateTime<Utc>),

    #[error("benchmark '{name}' has invalid value {value}")]
    InvalidBenchmark { name: &'static str, value: f64 },
}

/// Data-quality problems found on a single record. A defect only removes the
/// record from the sub-computation that needed the broken field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordDefect {
    #[error("status history is missing or unreadable")]
    MalformedHistory,

    #[error("status history timestamps go backwards at entry {0}")]
    UnorderedHistory(usize),

    #[error("rating {0} is outside 1-5")]
    RatingOutOfRange(f64),
}
