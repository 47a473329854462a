//! Failover wrapper: remote first, local fallback on transient failures.

use async_trait::async_trait;
use tracing::{info, warn};

use emo_models::{FrameData, InferenceOutcome, InferenceSource};

use crate::client::EmotionInference;
use crate::error::InferenceResult;
use crate::fallback::FallbackGenerator;
use crate::metrics::record_fallback;

/// Terminal error-recovery tier around a primary inference client.
///
/// Network failures, timeouts, non-success statuses and unusable bodies are
/// absorbed and replaced by a [`FallbackGenerator`] reading. Only
/// configuration errors reach the caller.
pub struct FailoverInference<P> {
    primary: P,
    fallback: FallbackGenerator,
}

impl<P: EmotionInference> FailoverInference<P> {
    pub fn new(primary: P, fallback: FallbackGenerator) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }
}

#[async_trait]
impl<P: EmotionInference> EmotionInference for FailoverInference<P> {
    async fn detect(&self, frame: &FrameData) -> InferenceResult<InferenceOutcome> {
        match self.primary.detect(frame).await {
            Ok(outcome) => Ok(outcome),
            Err(e) if !e.is_transient() => {
                warn!(tier = self.primary.name(), error = %e, "Inference misconfigured");
                Err(e)
            }
            Err(e) => {
                warn!(
                    tier = self.primary.name(),
                    error = %e,
                    "Inference backend failed, falling back to local readings"
                );
                record_fallback(e.kind());

                let response = self.fallback.generate().await;
                info!(
                    emotion = %response.emotion,
                    confidence = response.confidence,
                    "Using fallback reading"
                );

                Ok(InferenceOutcome {
                    response,
                    source: InferenceSource::Fallback,
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "failover"
    }
}
