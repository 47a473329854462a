//! Captured camera frames.
//!
//! Frames travel to the inference service as `data:image/jpeg;base64,...`
//! URLs, which is what a browser canvas produces.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// A captured frame encoded as a base64 JPEG data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameData(String);

impl FrameData {
    /// Encode raw JPEG bytes into a data URL.
    pub fn from_jpeg(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.is_empty() {
            return Err(FrameError::Empty);
        }
        Ok(Self(format!("{}{}", JPEG_DATA_URL_PREFIX, STANDARD.encode(bytes))))
    }

    /// Accept an already-encoded data URL, checking that its payload decodes.
    pub fn from_data_url(url: impl Into<String>) -> Result<Self, FrameError> {
        let url = url.into();
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(FrameError::Empty);
        }

        let (header, payload) = trimmed
            .split_once(',')
            .ok_or_else(|| FrameError::InvalidDataUrl("missing ',' separator".to_string()))?;

        if !header.starts_with("data:image/") || !header.ends_with(";base64") {
            return Err(FrameError::InvalidDataUrl(format!(
                "unsupported header '{}'",
                header
            )));
        }

        if payload.is_empty() {
            return Err(FrameError::Empty);
        }

        STANDARD
            .decode(payload)
            .map_err(|e| FrameError::InvalidDataUrl(format!("payload is not base64: {}", e)))?;

        Ok(Self(trimmed.to_string()))
    }

    /// The data URL as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decoded payload size in bytes.
    pub fn payload_len(&self) -> usize {
        self.0
            .split_once(',')
            .map(|(_, payload)| {
                let padding = payload.chars().rev().take_while(|c| *c == '=').count();
                (payload.len() / 4 * 3).saturating_sub(padding)
            })
            .unwrap_or(0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame is empty")]
    Empty,

    #[error("Invalid image data URL: {0}")]
    InvalidDataUrl(String),
}
