//! Error types for Dependency-Track API operations.

use thiserror::Error;

/// Errors that can occur during Dependency-Track API operations.
#[derive(Debug, Error)]
pub enum DtrackError {
    /// Configuration is missing or incomplete.
    #[error("Dependency-Track configuration required: {0}")]
    ConfigMissing(String),

    /// Listing options were rejected before any request was made.
    #[error("Invalid request options: {0}")]
    Validation(String),

    /// A multi-page traversal was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The API key was rejected or lacks the required permission.
    #[error("Unauthorized (HTTP {status_code}): {message}")]
    Unauthorized { message: String, status_code: u16 },

    /// API request failed.
    #[error("Dependency-Track API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// The server answered, but not in the shape a listing endpoint must have.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl DtrackError {
    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DtrackError::Unauthorized { status_code, .. } => Some(*status_code),
            DtrackError::ApiError { status_code, .. } => *status_code,
            DtrackError::RateLimited { .. } => Some(429),
            DtrackError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported the requested resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DtrackError::NotFound { .. }) || self.status_code() == Some(404)
    }
}

/// Result type alias for Dependency-Track operations.
pub type Result<T> = core::result::Result<T, DtrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_from_api_error() {
        let err = DtrackError::ApiError {
            message: "boom".to_string(),
            status_code: Some(500),
        };
        assert_eq!(err.status_code(), Some(500));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_detection() {
        let err = DtrackError::NotFound {
            entity_type: "Project",
            id: "abc".to_string(),
        };
        assert!(err.is_not_found());

        let err = DtrackError::ApiError {
            message: "The project could not be found.".to_string(),
            status_code: Some(404),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_message() {
        let err = DtrackError::Validation("page number must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid request options: page number must be at least 1"
        );
    }
}
