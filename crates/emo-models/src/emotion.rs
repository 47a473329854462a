//! Emotion samples and canonical emotion categories.
//!
//! Raw detector labels (e.g. `"excited"`, `"angry"`) are normalized into a
//! small set of canonical categories before any recommendation lookup:
//!
//! - `happy`: excited, energetic, joyful, surprised
//! - `stressed`: angry, frustrated, anxious, fearful, disgusted
//! - `neutral`: bored, calm, peaceful, focused, concentrated
//! - `sad`: tired, sleepy
//!
//! Labels outside the synonym table pass through (lower-cased) as their own
//! category.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single emotion detection. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmotionSample {
    /// Raw detector label
    pub emotion: String,
    /// Detector confidence in [0, 1]
    pub confidence: f64,
    /// Detection time (epoch milliseconds on the wire)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schemars(with = "i64")]
    pub timestamp: DateTime<Utc>,
}

impl EmotionSample {
    /// Create a sample, clamping confidence into [0, 1].
    pub fn new(emotion: impl Into<String>, confidence: f64, timestamp: DateTime<Utc>) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            emotion: emotion.into(),
            confidence,
            timestamp,
        }
    }

    /// Canonical category of this sample's raw label.
    pub fn category(&self) -> EmotionCategory {
        EmotionCategory::resolve(&self.emotion)
    }
}

/// Canonical emotion bucket used for recommendation lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EmotionCategory {
    Happy,
    Sad,
    Stressed,
    Neutral,
    /// Unmapped label, kept verbatim (lower-cased) as its own category.
    Other(String),
}

impl EmotionCategory {
    /// The four categories backed by recommendation catalogs.
    pub const CANONICAL: [EmotionCategory; 4] = [
        EmotionCategory::Happy,
        EmotionCategory::Sad,
        EmotionCategory::Stressed,
        EmotionCategory::Neutral,
    ];

    /// Map a raw detector label to its canonical category.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn resolve(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        match label.as_str() {
            "happy" | "excited" | "energetic" | "joyful" | "surprised" => EmotionCategory::Happy,
            "sad" | "tired" | "sleepy" => EmotionCategory::Sad,
            "stressed" | "angry" | "frustrated" | "anxious" | "fearful" | "disgusted" => {
                EmotionCategory::Stressed
            }
            "neutral" | "bored" | "calm" | "peaceful" | "focused" | "concentrated" => {
                EmotionCategory::Neutral
            }
            _ => EmotionCategory::Other(label),
        }
    }

    /// Returns the category key as a string.
    pub fn as_str(&self) -> &str {
        match self {
            EmotionCategory::Happy => "happy",
            EmotionCategory::Sad => "sad",
            EmotionCategory::Stressed => "stressed",
            EmotionCategory::Neutral => "neutral",
            EmotionCategory::Other(label) => label,
        }
    }

    /// Returns true for one of the four catalog-backed categories.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, EmotionCategory::Other(_))
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EmotionCategory {
    fn from(value: String) -> Self {
        EmotionCategory::resolve(&value)
    }
}

impl From<EmotionCategory> for String {
    fn from(value: EmotionCategory) -> Self {
        value.as_str().to_string()
    }
}
