//! Shared data models for the emotion music session engine.
//!
//! This crate provides Serde-serializable types for:
//! - Emotion samples and canonical emotion categories
//! - Music and study-subject recommendations
//! - Inference service wire types and captured frames
//! - Observable state snapshots for the rendering layer

pub mod emotion;
pub mod frame;
pub mod inference;
pub mod recommendation;
pub mod snapshot;

// Re-export common types
pub use emotion::{EmotionCategory, EmotionSample};
pub use frame::{FrameData, FrameError};
pub use inference::{DetectEmotionRequest, DetectEmotionResponse, InferenceSource, InferenceOutcome};
pub use recommendation::{MusicPayload, MusicTrack, Recommendation, StudySubject};
pub use snapshot::{DetectionSessionView, PlaybackView, StateSnapshot};
