use thiserror::Error;

/// Main error type for NextChapter
#[derive(Error, Debug)]
pub enum NextChapterError {
    /// Configuration errors (missing API key, bad config values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP errors (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion API answered 429; never retried
    #[error("API rate limit exceeded (429)")]
    RateLimited,

    /// The completion API answered 503
    #[error("Service unavailable (503): {0}")]
    ServiceUnavailable(String),

    /// Any other non-success status from the completion API
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The response envelope did not have the expected shape
    #[error("Malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// Terminal failure once the retry budget is spent
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Extracted JSON is not shaped like a graph
    #[error("Not a graph: {0}")]
    NotAGraph(String),

    /// Renderer refused its input
    #[error("Cannot render: {0}")]
    CannotRender(String),
}

impl NextChapterError {
    /// Whether another attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NextChapterError::Http(_)
                | NextChapterError::ServiceUnavailable(_)
                | NextChapterError::Api { .. }
                | NextChapterError::MalformedEnvelope(_)
        )
    }
}

/// Convenient Result type using NextChapterError
pub type Result<T> = std::result::Result<T, NextChapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NextChapterError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NextChapterError = io_err.into();
        assert!(matches!(err, NextChapterError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: NextChapterError = json_err.into();
        assert!(matches!(err, NextChapterError::Json(_)));
    }

    #[test]
    fn test_rate_limit_is_not_retryable() {
        assert!(!NextChapterError::RateLimited.is_retryable());
        assert!(!NextChapterError::Communication("x".into()).is_retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        assert!(NextChapterError::ServiceUnavailable("busy".into()).is_retryable());
        assert!(NextChapterError::Api { status: 500, body: "oops".into() }.is_retryable());
        assert!(NextChapterError::MalformedEnvelope("no text".into()).is_retryable());
    }

    #[test]
    fn test_api_error_display_carries_status() {
        let err = NextChapterError::Api { status: 502, body: "bad gateway".into() };
        assert_eq!(err.to_string(), "API error 502: bad gateway");
    }
}
