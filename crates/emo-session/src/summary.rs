//! Session summary statistics and JSON export.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emo_models::EmotionSample;

use crate::error::SessionResult;
use crate::history::EmotionHistory;

/// Aggregate view over the retained history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_date: DateTime<Utc>,
    /// Whole minutes since the session began
    pub duration: i64,
    pub total_detections: usize,
    /// Detections per raw label
    pub emotions: BTreeMap<String, usize>,
    pub most_frequent_emotion: String,
    /// Mean confidence, rounded to two decimals
    pub average_confidence: f64,
    pub emotion_history: Vec<EmotionSample>,
}

impl SessionSummary {
    /// Summarize `history`. `None` when there is nothing to summarize.
    pub fn from_history(
        history: &EmotionHistory,
        session_started_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        if history.is_empty() {
            return None;
        }

        let mut emotions = BTreeMap::new();
        // Ties go to whichever label appeared first.
        let mut first_seen: Vec<&str> = Vec::new();
        for sample in history.iter() {
            let count = emotions.entry(sample.emotion.clone()).or_insert(0usize);
            if *count == 0 {
                first_seen.push(&sample.emotion);
            }
            *count += 1;
        }

        let mut most_frequent = first_seen[0];
        for label in &first_seen[1..] {
            if emotions[*label] > emotions[most_frequent] {
                most_frequent = *label;
            }
        }

        let total = history.len();
        let mean = history.iter().map(|s| s.confidence).sum::<f64>() / total as f64;

        Some(Self {
            session_date: now,
            duration: (now - session_started_at).num_minutes().max(0),
            total_detections: total,
            most_frequent_emotion: most_frequent.to_string(),
            emotions,
            average_confidence: (mean * 100.0).round() / 100.0,
            emotion_history: history.to_vec(),
        })
    }

    pub fn to_json(&self) -> SessionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Default export file name, e.g. `emotion-session-2024-05-01.json`.
    pub fn file_name(&self) -> String {
        format!("emotion-session-{}.json", self.session_date.format("%Y-%m-%d"))
    }

    /// One-line description suitable for sharing.
    pub fn share_text(&self) -> String {
        format!(
            "I just completed a {} minute emotion-based music session! My most frequent emotion was {} 🎵",
            self.duration, self.most_frequent_emotion
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn history(rows: &[(&str, f64)]) -> EmotionHistory {
        let mut history = EmotionHistory::default();
        for (i, (label, confidence)) in rows.iter().enumerate() {
            history.push(EmotionSample::new(*label, *confidence, at(i as i64 * 1_000)));
        }
        history
    }

    #[test]
    fn test_empty_history_has_no_summary() {
        assert!(SessionSummary::from_history(&EmotionHistory::default(), at(0), at(1)).is_none());
    }

    #[test]
    fn test_counts_and_average() {
        let history = history(&[("happy", 0.9), ("sad", 0.7), ("happy", 0.8)]);
        let summary = SessionSummary::from_history(&history, at(0), at(754_000)).unwrap();

        assert_eq!(summary.total_detections, 3);
        assert_eq!(summary.emotions["happy"], 2);
        assert_eq!(summary.emotions["sad"], 1);
        assert_eq!(summary.most_frequent_emotion, "happy");
        assert_eq!(summary.average_confidence, 0.8);
        assert_eq!(summary.duration, 12);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let history = history(&[("sad", 0.5), ("calm", 0.5), ("calm", 0.5), ("sad", 0.5)]);
        let summary = SessionSummary::from_history(&history, at(0), at(0)).unwrap();
        assert_eq!(summary.most_frequent_emotion, "sad");
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let history = history(&[("happy", 0.851), ("happy", 0.777), ("happy", 0.6)]);
        let summary = SessionSummary::from_history(&history, at(0), at(0)).unwrap();
        assert_eq!(summary.average_confidence, 0.74);
    }

    #[test]
    fn test_json_keys() {
        let history = history(&[("focused", 0.81)]);
        let summary = SessionSummary::from_history(&history, at(0), at(60_000)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();

        for key in [
            "sessionDate",
            "duration",
            "totalDetections",
            "emotions",
            "mostFrequentEmotion",
            "averageConfidence",
            "emotionHistory",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["emotionHistory"][0]["emotion"], "focused");
        assert!(summary.share_text().contains("1 minute"));
    }

    #[test]
    fn test_file_name_uses_session_date() {
        let summary =
            SessionSummary::from_history(&history(&[("sad", 0.5)]), at(0), at(0)).unwrap();
        assert_eq!(summary.file_name(), "emotion-session-1970-01-01.json");

        let parsed: SessionSummary = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(parsed, summary);
    }
}
