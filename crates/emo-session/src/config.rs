//! Session engine configuration.

use std::time::Duration;

use crate::history::MAX_HISTORY_CAPACITY;

/// Timing and sizing for the session engine.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cooldown after a successful detection
    pub detection_cooldown: Duration,
    /// Length of one playback session
    pub session_duration: Duration,
    /// Length of one playback item
    pub item_duration: Duration,
    /// Capture cadence
    pub capture_interval: Duration,
    /// How long a capture signal stays raised
    pub capture_pulse: Duration,
    /// Delay between selecting an item and flagging it as playing
    pub activation_delay: Duration,
    /// Driver tick resolution
    pub tick_interval: Duration,
    /// Retained history entries, never more than 20
    pub history_capacity: usize,
    /// Initial playback volume (0..=100)
    pub default_volume: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            detection_cooldown: Duration::from_secs(600),
            session_duration: Duration::from_secs(600),
            item_duration: Duration::from_secs(600),
            capture_interval: Duration::from_millis(4000),
            capture_pulse: Duration::from_millis(100),
            activation_delay: Duration::from_millis(500),
            tick_interval: Duration::from_millis(250),
            history_capacity: MAX_HISTORY_CAPACITY,
            default_volume: 70,
        }
    }
}

impl SessionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            detection_cooldown: env_secs("DETECTION_COOLDOWN_SECS")
                .unwrap_or(defaults.detection_cooldown),
            session_duration: env_secs("SESSION_DURATION_SECS")
                .unwrap_or(defaults.session_duration),
            item_duration: env_secs("ITEM_DURATION_SECS").unwrap_or(defaults.item_duration),
            capture_interval: env_millis("CAPTURE_INTERVAL_MS")
                .unwrap_or(defaults.capture_interval),
            capture_pulse: env_millis("CAPTURE_PULSE_MS").unwrap_or(defaults.capture_pulse),
            activation_delay: env_millis("ACTIVATION_DELAY_MS")
                .unwrap_or(defaults.activation_delay),
            // The cooldown and session checks need at least 1s resolution.
            tick_interval: env_millis("DRIVER_TICK_MS")
                .map(|d| d.min(Duration::from_secs(1)))
                .unwrap_or(defaults.tick_interval),
            history_capacity: std::env::var("HISTORY_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .map(|n| n.min(MAX_HISTORY_CAPACITY))
                .unwrap_or(defaults.history_capacity),
            default_volume: std::env::var("DEFAULT_VOLUME")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|v: u8| v.min(100))
                .unwrap_or(defaults.default_volume),
        }
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &u64| *n > 0)
        .map(Duration::from_secs)
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &u64| *n > 0)
        .map(Duration::from_millis)
}
