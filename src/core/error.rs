//! Error types for bizhours_sla.
//!
//! Only structural failures surface as errors. Malformed individual ticket
//! values degrade to zero hours or undefined verdicts instead.

use thiserror::Error;

/// Result type alias for bizhours_sla operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building calendars or running the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Invalid business window: start_hour {start_hour} must be below end_hour {end_hour} (max 24)")]
    InvalidWindow { start_hour: u32, end_hour: u32 },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    // Calendar errors
    #[error("Duplicate calendar date: {0}")]
    DuplicateCalendarDate(chrono::NaiveDate),

    #[error("Calendar parse error: {0}")]
    CalendarParse(String),

    // Ticket errors
    #[error("Ticket table parse error: {0}")]
    TicketParse(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("batch worker failed: {}", err))
    }
}
