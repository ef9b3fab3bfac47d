//! Error types for table loading and the aggregation pipeline.

use chrono::NaiveDate;

/// Errors raised while filtering or slicing derived views.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid window: start date {start} is after end date {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Insufficient data: requested {requested} groups, only {available} available")]
    InsufficientData { requested: usize, available: usize },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

/// Errors raised while loading the source table. Loading stops at the first bad row.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: order_purchase_timestamp is missing")]
    MissingTimestamp { row: usize },

    #[error("Row {row}: malformed order_purchase_timestamp '{value}'")]
    MalformedTimestamp { row: usize, value: String },
}
