//! Error types for web research API operations

use thiserror::Error;

/// Result type for web research API operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to research APIs
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response could not be parsed
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// API reported a failure in an otherwise successful response
    #[error("{0}")]
    Api(String),

    /// Task run did not finish within the allowed time
    #[error("Research timed out after {seconds}s")]
    Timeout { seconds: u64 },
}
