//! Session engine error types.

use thiserror::Error;

use emo_ml_client::InferenceError;
use emo_models::FrameError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Camera error: {0}")]
    Capture(String),

    #[error("Invalid frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Failed to analyze emotion: {0}")]
    Inference(#[from] InferenceError),

    #[error("Volume must be between 0 and 100, got {0}")]
    InvalidVolume(u32),

    #[error("Export failed: {0}")]
    Export(String),
}

impl SessionError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Inference(_) => "Failed to analyze emotion. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Export(err.to_string())
    }
}
