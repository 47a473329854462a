//! Recommendation records.
//!
//! Each recommendation domain has its own tagged record type instead of a
//! loosely-typed map: catalog music tracks and study-subject suggestions.
//! [`MusicPayload`] is the looser shape the inference service returns.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A track from the built-in music catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MusicTrack {
    /// Stable identifier (embed video id)
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Nominal play duration in seconds
    pub duration_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_art: Option<String>,
}

impl MusicTrack {
    pub fn new(id: &str, title: &str, artist: &str, duration_secs: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            duration_secs,
            album_art: Some("🎵".to_string()),
        }
    }
}

/// A study-subject suggestion for one emotion category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StudySubject {
    /// Main subject to work on
    pub primary: String,
    /// Up to three alternative subjects
    pub secondary: Vec<String>,
    /// Suggested session length, e.g. "45-60 minutes"
    pub duration: String,
    pub tips: Vec<String>,
    pub reasoning: String,
}

/// A recommendation issued by one of the selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    Music(MusicTrack),
    Study(StudySubject),
}

/// Music object returned by the inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MusicPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_art: Option<String>,
    /// Any additional fields the service attaches
    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MusicPayload {
    pub fn new(title: &str, artist: &str, duration: f64) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            album: None,
            duration,
            url: None,
            album_art: Some("🎵".to_string()),
            extra: serde_json::Map::new(),
        }
    }
}
