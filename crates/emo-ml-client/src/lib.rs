//! Client for the emotion-inference service.
//!
//! This crate provides:
//! - The [`EmotionInference`] seam consumed by the session engine
//! - An HTTP client for `POST /detect-emotion`
//! - A local fallback generator used when the service is unreachable
//! - A failover wrapper that never surfaces transient I/O failures

pub mod client;
pub mod config;
pub mod error;
pub mod failover;
pub mod fallback;
pub mod metrics;

pub use client::{EmotionInference, HttpInferenceClient};
pub use config::InferenceConfig;
pub use error::{InferenceError, InferenceResult};
pub use failover::FailoverInference;
pub use fallback::FallbackGenerator;
