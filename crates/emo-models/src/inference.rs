//! Wire types for the remote emotion-inference service.
//!
//! `POST {backend}/detect-emotion` takes `{"image": "<data url>"}` and answers
//! `{emotion, confidence, music, subject?, timestamp?}`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::frame::FrameData;
use crate::recommendation::MusicPayload;

/// Request body for `/detect-emotion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectEmotionRequest {
    pub image: FrameData,
}

/// Response body from `/detect-emotion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectEmotionResponse {
    pub emotion: String,
    pub confidence: f64,
    pub music: MusicPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Set by the service when it could not analyze the frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which tier produced an inference result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InferenceSource {
    /// The remote inference service
    Remote,
    /// The local fallback generator
    Fallback,
}

impl InferenceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceSource::Remote => "remote",
            InferenceSource::Fallback => "fallback",
        }
    }
}

/// An inference result tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOutcome {
    pub response: DetectEmotionResponse,
    pub source: InferenceSource,
}
