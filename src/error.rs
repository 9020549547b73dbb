use thiserror::Error;

/// Main error type for JPush API operations
#[derive(Debug, Error)]
pub enum Error {
    /// Non-200 HTTP response from a JPush endpoint
    #[error("JPush API error {status}: {message}")]
    Status { status: u16, message: String },

    /// HTTP transport error (connection, read)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Caller-supplied input failed validation before any request was made
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new status error from an HTTP status code and message text
    pub fn status(status: u16, message: String) -> Self {
        Error::Status { status, message }
    }

    /// Check if this error is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Status { status: 404, .. })
    }

    /// Get the HTTP status code if the remote rejected the request
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for JPush operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_not_found() {
        let error = Error::status(404, "Not Found".to_string());
        assert!(error.is_not_found());
        assert_eq!(error.status_code(), Some(404));
    }

    #[test]
    fn test_error_display() {
        let error = Error::status(401, "Basic authentication failed".to_string());
        assert_eq!(
            error.to_string(),
            "JPush API error 401: Basic authentication failed"
        );
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_invalid_input_has_no_status() {
        let error = Error::InvalidInput("empty msg id list".to_string());
        assert_eq!(error.status_code(), None);
    }
}
