//! Local fallback generator.
//!
//! Used when the inference service is unreachable. Picks uniformly from a
//! small fixed table, jitters the baseline confidence by up to ±0.1 (clamped
//! to [0.6, 0.95]) and waits 1–2 seconds so the UI sees roughly the same
//! latency as a real call. It never fails.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use emo_models::{
    DetectEmotionResponse, FrameData, InferenceOutcome, InferenceSource, MusicPayload,
};

use crate::client::EmotionInference;
use crate::config::InferenceConfig;
use crate::error::InferenceResult;

/// Lowest confidence the fallback will report.
pub const MIN_FALLBACK_CONFIDENCE: f64 = 0.6;
/// Highest confidence the fallback will report.
pub const MAX_FALLBACK_CONFIDENCE: f64 = 0.95;

const CONFIDENCE_JITTER: f64 = 0.2;

struct CannedReading {
    emotion: &'static str,
    confidence: f64,
    title: &'static str,
    artist: &'static str,
    duration: f64,
}

const CANNED_READINGS: [CannedReading; 7] = [
    CannedReading {
        emotion: "happy",
        confidence: 0.85,
        title: "Happy - Pharrell Williams",
        artist: "Pharrell Williams",
        duration: 285.0,
    },
    CannedReading {
        emotion: "sad",
        confidence: 0.78,
        title: "Someone Like You",
        artist: "Adele",
        duration: 285.0,
    },
    CannedReading {
        emotion: "excited",
        confidence: 0.92,
        title: "Uptown Funk",
        artist: "Bruno Mars",
        duration: 270.0,
    },
    CannedReading {
        emotion: "calm",
        confidence: 0.88,
        title: "Weightless",
        artist: "Marconi Union",
        duration: 480.0,
    },
    CannedReading {
        emotion: "focused",
        confidence: 0.81,
        title: "Ludovico Einaudi - Nuvole Bianche",
        artist: "Ludovico Einaudi",
        duration: 342.0,
    },
    CannedReading {
        emotion: "energetic",
        confidence: 0.89,
        title: "Thunderstruck",
        artist: "AC/DC",
        duration: 292.0,
    },
    CannedReading {
        emotion: "relaxed",
        confidence: 0.76,
        title: "Claire de Lune",
        artist: "Claude Debussy",
        duration: 300.0,
    },
];

/// Generates plausible readings without a backend.
#[derive(Debug, Clone)]
pub struct FallbackGenerator {
    delay_min: Duration,
    delay_max: Duration,
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new(&InferenceConfig::default())
    }
}

impl FallbackGenerator {
    pub fn new(config: &InferenceConfig) -> Self {
        Self::with_delay(config.fallback_delay_min, config.fallback_delay_max)
    }

    /// Generator with explicit delay bounds. Bounds are reordered if swapped.
    pub fn with_delay(min: Duration, max: Duration) -> Self {
        let (delay_min, delay_max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            delay_min,
            delay_max,
        }
    }

    /// Emotion labels the generator can produce.
    pub fn labels() -> impl Iterator<Item = &'static str> {
        CANNED_READINGS.iter().map(|r| r.emotion)
    }

    /// Pick a reading without waiting.
    pub fn reading<R: Rng>(&self, rng: &mut R) -> DetectEmotionResponse {
        let canned = &CANNED_READINGS[rng.random_range(0..CANNED_READINGS.len())];
        let jitter = (rng.random::<f64>() - 0.5) * CONFIDENCE_JITTER;
        let confidence = (canned.confidence + jitter)
            .clamp(MIN_FALLBACK_CONFIDENCE, MAX_FALLBACK_CONFIDENCE);

        DetectEmotionResponse {
            emotion: canned.emotion.to_string(),
            confidence: (confidence * 100.0).round() / 100.0,
            music: MusicPayload::new(canned.title, canned.artist, canned.duration),
            subject: None,
            timestamp: None,
            error: None,
        }
    }

    /// Artificial latency for one reading.
    pub fn delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let min_ms = self.delay_min.as_millis() as u64;
        let max_ms = self.delay_max.as_millis() as u64;
        Duration::from_millis(rng.random_range(min_ms..=max_ms))
    }

    /// Produce a reading after the artificial delay.
    pub async fn generate(&self) -> DetectEmotionResponse {
        // ThreadRng is not Send, so draw everything before awaiting.
        let (response, delay) = {
            let mut rng = rand::rng();
            (self.reading(&mut rng), self.delay(&mut rng))
        };

        debug!(
            emotion = %response.emotion,
            delay_ms = delay.as_millis() as u64,
            "Generated fallback reading"
        );

        tokio::time::sleep(delay).await;
        response
    }
}

#[async_trait]
impl EmotionInference for FallbackGenerator {
    async fn detect(&self, _frame: &FrameData) -> InferenceResult<InferenceOutcome> {
        Ok(InferenceOutcome {
            response: self.generate().await,
            source: InferenceSource::Fallback,
        })
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
