//! Inference client error types.

use thiserror::Error;

/// Result type for inference operations.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Errors that can occur while calling the inference service.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Service reported error: {0}")]
    Service(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
}

impl InferenceError {
    /// Build an error from a non-success HTTP status.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// True for failures of the transport or the remote service, which the
    /// failover tier absorbs. Configuration errors are not transient.
    pub fn is_transient(&self) -> bool {
        !matches!(self, InferenceError::Config(_))
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::Config(_) => "config",
            InferenceError::Http { .. } => "http",
            InferenceError::Service(_) => "service",
            InferenceError::InvalidResponse(_) => "invalid_response",
            InferenceError::Timeout => "timeout",
            InferenceError::Network(_) => "network",
        }
    }
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InferenceError::Timeout
        } else if err.is_decode() {
            InferenceError::InvalidResponse(err.to_string())
        } else {
            InferenceError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_error_message() {
        let err = InferenceError::from_http_status(503, "unavailable");
        assert_eq!(err.to_string(), "Backend error: 503: unavailable");
        assert!(err.is_transient());
        assert_eq!(err.kind(), "http");
    }

    #[test]
    fn test_config_error_is_not_transient() {
        assert!(!InferenceError::Config("bad".into()).is_transient());
        assert!(InferenceError::Timeout.is_transient());
        assert!(InferenceError::Service("no face".into()).is_transient());
    }
}
