//! Playback session timer.
//!
//! A playback session starts on the first detection and runs for a fixed
//! total duration. Within it one music item plays at a time; items rotate
//! when they complete or when the detected emotion changes. At expiry the
//! whole session is torn down and no further item starts.
//!
//! The timer never reads a clock itself: every transition takes `now`, and
//! the store drives [`PlaybackTimer::tick`] from the session driver.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use emo_models::{MusicTrack, PlaybackView};

use crate::clock::{after, elapsed_ms};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::metrics;
use crate::selector::MusicSelector;

/// Something that happened to the playback session.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A new session began, with its first item if the category has one
    Started(Option<MusicTrack>),
    /// The item changed because the emotion changed
    EmotionChanged(Option<MusicTrack>),
    /// The previous item ran to completion
    ItemCompleted(MusicTrack),
    /// The user skipped ahead
    Skipped(MusicTrack),
    /// The activation delay elapsed and the item is now playing
    Activated,
    /// The session reached its total duration and was cleared
    Expired,
}

#[derive(Debug, Clone)]
struct Session {
    label: String,
    started_at: DateTime<Utc>,
    item: Option<MusicTrack>,
    item_started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PlaybackTimer {
    selector: MusicSelector,
    session: Option<Session>,
    activate_at: Option<DateTime<Utc>>,
    is_playing: bool,
    volume: u8,
    muted: bool,
    session_duration: std::time::Duration,
    item_duration: std::time::Duration,
    activation_delay: std::time::Duration,
}

impl PlaybackTimer {
    pub fn new(config: &SessionConfig, selector: MusicSelector) -> Self {
        Self {
            selector,
            session: None,
            activate_at: None,
            is_playing: false,
            volume: config.default_volume.min(100),
            muted: false,
            session_duration: config.session_duration,
            item_duration: config.item_duration,
            activation_delay: config.activation_delay,
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_item(&self) -> Option<&MusicTrack> {
        self.session.as_ref().and_then(|s| s.item.as_ref())
    }

    pub fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.session.as_ref().map(|s| s.started_at)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Feed a freshly detected emotion.
    ///
    /// Starts a session when none is running. A different label swaps the
    /// item but keeps the session start; the same label is ignored.
    pub fn on_emotion<R: Rng>(
        &mut self,
        label: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<PlaybackEvent> {
        match self.session.as_mut() {
            None => {
                let item = self.selector.select(label, now, rng);
                info!(
                    emotion = %label,
                    track = item.as_ref().map(|t| t.title.as_str()).unwrap_or("none"),
                    "Playback session started"
                );
                self.session = Some(Session {
                    label: label.to_string(),
                    started_at: now,
                    item: item.clone(),
                    item_started_at: now,
                });
                self.arm_activation(now, item.is_some());
                if item.is_some() {
                    metrics::record_item_change("started");
                }
                Some(PlaybackEvent::Started(item))
            }
            Some(session) if session.label != label => {
                let exclude = session.item.as_ref().map(|t| t.id.clone());
                let item = self
                    .selector
                    .select_excluding(label, exclude.as_deref(), now, rng);
                info!(
                    from = %session.label,
                    to = %label,
                    track = item.as_ref().map(|t| t.title.as_str()).unwrap_or("none"),
                    "Emotion changed, switching item"
                );
                session.label = label.to_string();
                session.item = item.clone();
                session.item_started_at = now;
                self.arm_activation(now, item.is_some());
                if item.is_some() {
                    metrics::record_item_change("emotion_changed");
                }
                Some(PlaybackEvent::EmotionChanged(item))
            }
            Some(_) => None,
        }
    }

    /// Advance the session to `now`.
    ///
    /// Expiry is checked first and wins over item completion, so no new
    /// item starts at or after the session end.
    pub fn tick<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();

        let Some(session) = self.session.as_mut() else {
            return events;
        };

        if now >= after(session.started_at, self.session_duration) {
            info!(
                emotion = %session.label,
                duration_secs = self.session_duration.as_secs(),
                "Playback session expired"
            );
            self.clear();
            metrics::record_session_expired();
            events.push(PlaybackEvent::Expired);
            return events;
        }

        let finished = session.item.as_ref().filter(|_| {
            now >= after(session.item_started_at, self.item_duration)
        });
        if let Some(finished) = finished.cloned() {
            let next = self
                .selector
                .select_excluding(&session.label, Some(&finished.id), now, rng)
                // Single-item pool: replay it.
                .unwrap_or_else(|| finished.clone());
            debug!(finished = %finished.title, next = %next.title, "Item completed");

            session.item = Some(next.clone());
            session.item_started_at = now;
            self.arm_activation(now, true);
            metrics::record_item_change("completed");
            events.push(PlaybackEvent::ItemCompleted(next));
        }

        if self.activate_at.is_some_and(|at| now >= at) {
            self.activate_at = None;
            self.is_playing = true;
            events.push(PlaybackEvent::Activated);
        }

        events
    }

    /// Flip play/pause. No-op without a current item; returns whether it applied.
    pub fn toggle_play(&mut self) -> bool {
        if self.current_item().is_none() {
            return false;
        }
        self.activate_at = None;
        self.is_playing = !self.is_playing;
        debug!(playing = self.is_playing, "Playback toggled");
        true
    }

    /// Move to a different item immediately. No-op without a session.
    pub fn skip<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Option<PlaybackEvent> {
        let session = self.session.as_mut()?;
        let exclude = session.item.as_ref().map(|t| t.id.clone());
        let next = self
            .selector
            .select_excluding(&session.label, exclude.as_deref(), now, rng)?;

        debug!(track = %next.title, "Skipped to next item");
        session.item = Some(next.clone());
        session.item_started_at = now;
        self.arm_activation(now, true);
        metrics::record_item_change("skipped");
        Some(PlaybackEvent::Skipped(next))
    }

    /// Set volume in 0..=100. Setting a volume unmutes.
    pub fn set_volume(&mut self, volume: u32) -> SessionResult<u8> {
        let volume = u8::try_from(volume)
            .ok()
            .filter(|v| *v <= 100)
            .ok_or(SessionError::InvalidVolume(volume))?;
        self.volume = volume;
        self.muted = false;
        Ok(volume)
    }

    /// Returns the new muted state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Time left before the session expires.
    pub fn remaining_session(&self, now: DateTime<Utc>) -> std::time::Duration {
        self.session
            .as_ref()
            .map(|s| {
                let elapsed = std::time::Duration::from_millis(elapsed_ms(s.started_at, now));
                self.session_duration.saturating_sub(elapsed)
            })
            .unwrap_or_default()
    }

    /// Progress through the current item.
    pub fn item_elapsed(&self, now: DateTime<Utc>) -> std::time::Duration {
        self.session
            .as_ref()
            .filter(|s| s.item.is_some())
            .map(|s| std::time::Duration::from_millis(elapsed_ms(s.item_started_at, now)))
            .unwrap_or_default()
    }

    pub fn view(&self, now: DateTime<Utc>) -> PlaybackView {
        PlaybackView {
            emotion_label: self.session.as_ref().map(|s| s.label.clone()),
            session_started_at: self.session_started_at(),
            current_track: self.current_item().cloned(),
            item_started_at: self
                .session
                .as_ref()
                .filter(|s| s.item.is_some())
                .map(|s| s.item_started_at),
            is_playing: self.is_playing,
            volume: self.volume,
            muted: self.muted,
            remaining_session_secs: self.remaining_session(now).as_secs(),
            item_elapsed_secs: self.item_elapsed(now).as_secs(),
        }
    }

    fn arm_activation(&mut self, now: DateTime<Utc>, has_item: bool) {
        self.is_playing = false;
        self.activate_at = has_item.then(|| after(now, self.activation_delay));
    }

    fn clear(&mut self) {
        self.session = None;
        self.activate_at = None;
        self.is_playing = false;
        self.selector.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emo_models::EmotionCategory;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::time::Duration;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn timer() -> PlaybackTimer {
        PlaybackTimer::new(&SessionConfig::default(), MusicSelector::default())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn in_category(track: &MusicTrack, category: EmotionCategory) -> bool {
        crate::catalog::music_catalog()[&category]
            .iter()
            .any(|t| t.id == track.id)
    }

    #[test]
    fn test_first_detection_starts_session() {
        let mut timer = timer();
        let mut rng = rng();

        let event = timer.on_emotion("excited", at(0), &mut rng).unwrap();
        let PlaybackEvent::Started(Some(track)) = event else {
            panic!("expected a started session with a track, got {:?}", event);
        };
        assert!(in_category(&track, EmotionCategory::Happy));
        assert_eq!(timer.session_started_at(), Some(at(0)));
        assert!(!timer.is_playing());
    }

    #[test]
    fn test_activation_delay() {
        let mut timer = timer();
        let mut rng = rng();
        timer.on_emotion("happy", at(0), &mut rng);

        assert!(timer.tick(at(499), &mut rng).is_empty());
        assert!(!timer.is_playing());
        assert_eq!(timer.tick(at(500), &mut rng), vec![PlaybackEvent::Activated]);
        assert!(timer.is_playing());
    }

    #[test]
    fn test_emotion_change_scenario() {
        let mut timer = timer();
        let mut rng = rng();

        timer.on_emotion("excited", at(0), &mut rng);
        timer.tick(at(500), &mut rng);

        let event = timer.on_emotion("angry", at(120_000), &mut rng).unwrap();
        let PlaybackEvent::EmotionChanged(Some(track)) = event else {
            panic!("expected an item swap, got {:?}", event);
        };
        assert!(in_category(&track, EmotionCategory::Stressed));
        assert_eq!(timer.session_started_at(), Some(at(0)));
        assert!(!timer.is_playing());

        let view = timer.view(at(130_000));
        assert_eq!(view.item_started_at, Some(at(120_000)));
        assert_eq!(view.item_elapsed_secs, 10);
        assert_eq!(view.remaining_session_secs, 470);

        assert!(timer.tick(at(599_999), &mut rng).iter().all(|e| *e != PlaybackEvent::Expired));
        assert_eq!(timer.tick(at(600_000), &mut rng), vec![PlaybackEvent::Expired]);
        assert!(!timer.is_running());
        assert!(timer.current_item().is_none());
        assert!(!timer.is_playing());
    }

    #[test]
    fn test_same_label_is_ignored() {
        let mut timer = timer();
        let mut rng = rng();
        timer.on_emotion("calm", at(0), &mut rng);
        let first = timer.current_item().cloned();

        assert!(timer.on_emotion("calm", at(60_000), &mut rng).is_none());
        assert_eq!(timer.current_item().cloned(), first);
    }

    #[test]
    fn test_item_completion_picks_different_item() {
        let config = SessionConfig {
            item_duration: Duration::from_secs(180),
            ..SessionConfig::default()
        };
        let mut timer = PlaybackTimer::new(&config, MusicSelector::default());
        let mut rng = rng();

        timer.on_emotion("sad", at(0), &mut rng);
        let first = timer.current_item().cloned().unwrap();

        let events = timer.tick(at(180_000), &mut rng);
        let Some(PlaybackEvent::ItemCompleted(next)) = events.first() else {
            panic!("expected item completion, got {:?}", events);
        };
        assert_ne!(next.id, first.id);
        assert_eq!(timer.session_started_at(), Some(at(0)));
        assert_eq!(timer.view(at(180_000)).item_started_at, Some(at(180_000)));
    }

    #[test]
    fn test_expiry_wins_over_item_completion() {
        let mut timer = timer();
        let mut rng = rng();
        timer.on_emotion("neutral", at(0), &mut rng);

        // Session and item both end at 600s.
        let events = timer.tick(at(600_000), &mut rng);
        assert_eq!(events, vec![PlaybackEvent::Expired]);
        assert!(timer.current_item().is_none());
    }

    #[test]
    fn test_new_session_after_expiry() {
        let mut timer = timer();
        let mut rng = rng();
        timer.on_emotion("happy", at(0), &mut rng);
        timer.tick(at(600_000), &mut rng);

        let event = timer.on_emotion("happy", at(601_000), &mut rng);
        assert!(matches!(event, Some(PlaybackEvent::Started(Some(_)))));
        assert_eq!(timer.session_started_at(), Some(at(601_000)));
    }

    #[test]
    fn test_toggle_requires_item() {
        let mut timer = timer();
        let mut rng = rng();
        assert!(!timer.toggle_play());

        timer.on_emotion("happy", at(0), &mut rng);
        assert!(timer.toggle_play());
        assert!(timer.is_playing());
        // A manual toggle cancels the pending activation.
        assert!(timer.tick(at(1_000), &mut rng).is_empty());
        assert!(timer.toggle_play());
        assert!(!timer.is_playing());
    }

    #[test]
    fn test_unknown_category_session_has_no_item() {
        let mut timer = timer();
        let mut rng = rng();

        let event = timer.on_emotion("relaxed", at(0), &mut rng);
        assert_eq!(event, Some(PlaybackEvent::Started(None)));
        assert!(timer.is_running());
        assert!(!timer.toggle_play());
        assert!(timer.tick(at(1_000), &mut rng).is_empty());
        assert!(timer.skip(at(2_000), &mut rng).is_none());
    }

    #[test]
    fn test_skip_changes_item() {
        let mut timer = timer();
        let mut rng = rng();
        assert!(timer.skip(at(0), &mut rng).is_none());

        timer.on_emotion("stressed", at(0), &mut rng);
        let first = timer.current_item().cloned().unwrap();
        let Some(PlaybackEvent::Skipped(next)) = timer.skip(at(30_000), &mut rng) else {
            panic!("expected skip");
        };
        assert_ne!(next.id, first.id);
        assert_eq!(timer.session_started_at(), Some(at(0)));
    }

    #[test]
    fn test_single_item_pool_replays_on_completion() {
        let config = SessionConfig {
            item_duration: Duration::from_secs(60),
            ..SessionConfig::default()
        };
        let selector = MusicSelector::new(HashMap::from([(
            EmotionCategory::Sad,
            vec![MusicTrack::new("only", "Only", "Artist", 60)],
        )]));
        let mut timer = PlaybackTimer::new(&config, selector);
        let mut rng = rng();

        timer.on_emotion("sad", at(0), &mut rng);
        let events = timer.tick(at(60_000), &mut rng);
        assert!(matches!(&events[0], PlaybackEvent::ItemCompleted(t) if t.id == "only"));
    }

    #[test]
    fn test_volume_and_mute() {
        let mut timer = timer();
        assert_eq!(timer.view(at(0)).volume, 70);

        assert!(timer.toggle_mute());
        assert_eq!(timer.set_volume(30).unwrap(), 30);
        assert!(!timer.view(at(0)).muted);

        assert!(matches!(
            timer.set_volume(101),
            Err(SessionError::InvalidVolume(101))
        ));
        assert_eq!(timer.view(at(0)).volume, 30);
        assert_eq!(timer.set_volume(0).unwrap(), 0);
    }

    #[test]
    fn test_idle_view() {
        let view = timer().view(at(5_000));
        assert!(view.emotion_label.is_none());
        assert!(view.current_track.is_none());
        assert_eq!(view.remaining_session_secs, 0);
        assert_eq!(view.item_elapsed_secs, 0);
    }
}
