//! Error types for issue tracker operations

use thiserror::Error;

/// Result type for issue tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching issue context
#[derive(Error, Debug)]
pub enum Error {
    /// Required credential is not configured
    #[error("{var} not set, skipping {backend} issue")]
    MissingToken {
        backend: &'static str,
        var: &'static str,
    },

    /// External tool invocation failed
    #[error("{0}")]
    Tool(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// GraphQL-level errors in an otherwise successful response
    #[error("GraphQL errors: {0}")]
    GraphQL(String),

    /// Response could not be parsed
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Issue does not exist or is not visible
    #[error("{0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error looks like a permissions problem
    ///
    /// Covers HTTP 403 and error text mentioning permissions, from any of the
    /// three trackers.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Error::Status { status, .. } => *status == reqwest::StatusCode::FORBIDDEN,
            Error::Tool(msg) | Error::GraphQL(msg) | Error::NotFound(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("permission") || msg.contains("forbidden")
            }
            _ => false,
        }
    }

    /// Remediation hint for permission-shaped failures
    pub fn access_hint(&self) -> Option<&'static str> {
        if self.is_permission_denied() {
            Some("check that your token has access to this resource")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_status_is_permission_denied() {
        let err = Error::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "no".to_string(),
        };
        assert!(err.is_permission_denied());
        assert!(err.access_hint().is_some());
    }

    #[test]
    fn test_permission_text_is_permission_denied() {
        let err = Error::Tool("GraphQL: Resource not accessible, Permission denied".to_string());
        assert!(err.is_permission_denied());

        let err = Error::GraphQL("FORBIDDEN: viewer cannot read issue".to_string());
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_ordinary_errors_have_no_hint() {
        let err = Error::NotFound("Linear issue ENG-1 not found".to_string());
        assert!(!err.is_permission_denied());
        assert!(err.access_hint().is_none());

        let err = Error::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "missing".to_string(),
        };
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_missing_token_message() {
        let err = Error::MissingToken {
            backend: "Linear",
            var: "LINEAR_API_KEY",
        };
        assert_eq!(err.to_string(), "LINEAR_API_KEY not set, skipping Linear issue");
    }
}
