//! Session engine metrics.

use metrics::{counter, gauge};

/// Metric name constants for consistency.
pub mod names {
    /// Detections applied to the store, by category and inference tier.
    pub const DETECTIONS_TOTAL: &str = "emo_detections_total";

    /// Snapshots ignored because capture was gated.
    pub const SNAPSHOTS_SKIPPED_TOTAL: &str = "emo_snapshots_skipped_total";

    /// Analyses that failed without a fallback.
    pub const ANALYSIS_FAILURES_TOTAL: &str = "emo_analysis_failures_total";

    /// Playback item changes, by reason.
    pub const ITEM_CHANGES_TOTAL: &str = "emo_playback_item_changes_total";

    /// Playback sessions torn down on expiry.
    pub const SESSIONS_EXPIRED_TOTAL: &str = "emo_playback_sessions_expired_total";

    /// 1 while a detection cooldown is running.
    pub const DETECTION_SESSION_ACTIVE: &str = "emo_detection_session_active";
}

pub fn record_detection(category: &str, source: &str) {
    counter!(
        names::DETECTIONS_TOTAL,
        "category" => category.to_string(),
        "source" => source.to_string()
    )
    .increment(1);
}

pub fn record_snapshot_skipped(reason: &'static str) {
    counter!(names::SNAPSHOTS_SKIPPED_TOTAL, "reason" => reason).increment(1);
}

pub fn record_analysis_failure(kind: &'static str) {
    counter!(names::ANALYSIS_FAILURES_TOTAL, "kind" => kind).increment(1);
}

pub fn record_item_change(reason: &'static str) {
    counter!(names::ITEM_CHANGES_TOTAL, "reason" => reason).increment(1);
}

pub fn record_session_expired() {
    counter!(names::SESSIONS_EXPIRED_TOTAL).increment(1);
}

pub fn set_detection_session_active(active: bool) {
    gauge!(names::DETECTION_SESSION_ACTIVE).set(if active { 1.0 } else { 0.0 });
}
