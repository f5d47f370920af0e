//! Error types for statboard-weather

use thiserror::Error;

/// Result type alias for statboard-weather operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the weather API
#[derive(Debug, Error)]
pub enum Error {
    /// Transport or JSON decoding failure from the HTTP client
    #[error("forecast request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("weather api returned {status} for {url}")]
    Status {
        /// HTTP status of the response
        status: reqwest::StatusCode,
        /// URL that was requested
        url: String,
    },

    /// The forecast document contained no periods
    #[error("received no forecast periods from the weather api")]
    NoPeriods,
}
