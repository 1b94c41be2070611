//! Error types for calsheet.

use thiserror::Error;

/// Errors that can occur while turning rows into calendars.
#[derive(Error, Debug)]
pub enum CalsheetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: invalid {column} value '{value}'")]
    DateParse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Page size must be at least 1")]
    InvalidPageSize,

    #[error("Page {page} out of range (document has {total} page(s))")]
    PageOutOfRange { page: usize, total: usize },

    #[error("No events to render")]
    NoEvents,

    #[error("Icon error: {0}")]
    Icon(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calsheet operations.
pub type CalsheetResult<T> = Result<T, CalsheetError>;
