//! Read-only views of engine state, as consumed by the rendering layer.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionSample;
use crate::recommendation::{MusicPayload, MusicTrack, StudySubject};

/// Detection cooldown timing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSessionView {
    pub active: bool,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    #[schemars(with = "Option<i64>")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    #[schemars(with = "Option<i64>")]
    pub next_allowed_time: Option<DateTime<Utc>>,
}

/// Playback session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackView {
    /// Raw label of the emotion driving the session
    pub emotion_label: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    #[schemars(with = "Option<i64>")]
    pub session_started_at: Option<DateTime<Utc>>,
    pub current_track: Option<MusicTrack>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    #[schemars(with = "Option<i64>")]
    pub item_started_at: Option<DateTime<Utc>>,
    pub is_playing: bool,
    /// 0..=100
    pub volume: u8,
    pub muted: bool,
    pub remaining_session_secs: u64,
    pub item_elapsed_secs: u64,
}

/// Full observable state of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub current_emotion: Option<EmotionSample>,
    /// Music payload from the latest detection
    pub current_music: Option<MusicPayload>,
    pub current_subject: Option<StudySubject>,
    /// Oldest first
    pub history: Vec<EmotionSample>,
    pub is_analyzing: bool,
    pub error: Option<String>,
    pub should_capture: bool,
    pub detection_session: DetectionSessionView,
    pub playback: PlaybackView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_view_wire_names() {
        let view = DetectionSessionView {
            active: true,
            start_time: DateTime::from_timestamp_millis(1_000),
            next_allowed_time: DateTime::from_timestamp_millis(601_000),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["active"], true);
        assert_eq!(value["startTime"], 1_000);
        assert_eq!(value["nextAllowedTime"], 601_000);
    }

    #[test]
    fn test_idle_detection_view_serializes_nulls() {
        let value = serde_json::to_value(DetectionSessionView::default()).unwrap();
        assert_eq!(value["active"], false);
        assert!(value["startTime"].is_null());
        assert!(value["nextAllowedTime"].is_null());
    }
}
