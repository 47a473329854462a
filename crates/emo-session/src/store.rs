//! The emotion store: single owner of all session state.
//!
//! Every machine (history, detection session, capture scheduler, playback
//! timer, study selector) lives behind one mutex so transitions are
//! serialized. The lock is never held across an `.await`: inference runs
//! outside it, with the `analyzing` flag guarding re-entry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use emo_ml_client::EmotionInference;
use emo_models::{
    EmotionSample, FrameData, MusicPayload, PlaybackView, Recommendation, StateSnapshot,
    StudySubject,
};

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::detection::DetectionSession;
use crate::error::{SessionError, SessionResult};
use crate::frame_source::FrameSource;
use crate::history::EmotionHistory;
use crate::metrics;
use crate::playback::{PlaybackEvent, PlaybackTimer};
use crate::scheduler::CaptureScheduler;
use crate::selector::{MusicSelector, StudySelector};
use crate::summary::SessionSummary;

/// What happened to a submitted frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    /// The frame was analyzed and the detection applied
    Processed(EmotionSample),
    /// Ignored: a detection cooldown is running
    SkippedSessionActive,
    /// Ignored: another analysis is in flight
    SkippedAnalyzing,
    /// The frame source had nothing to offer
    NoFrame,
}

impl SnapshotOutcome {
    pub fn sample(&self) -> Option<&EmotionSample> {
        match self {
            SnapshotOutcome::Processed(sample) => Some(sample),
            _ => None,
        }
    }
}

struct State {
    started_at: DateTime<Utc>,
    history: EmotionHistory,
    detection: DetectionSession,
    scheduler: CaptureScheduler,
    playback: PlaybackTimer,
    study: StudySelector,
    current_emotion: Option<EmotionSample>,
    current_music: Option<MusicPayload>,
    current_subject: Option<StudySubject>,
    is_analyzing: bool,
    error: Option<String>,
    rng: StdRng,
}

impl State {
    /// Capture is gated while analyzing or while a cooldown runs.
    fn gate(&self) -> Option<SnapshotOutcome> {
        if self.detection.is_active() {
            Some(SnapshotOutcome::SkippedSessionActive)
        } else if self.is_analyzing {
            Some(SnapshotOutcome::SkippedAnalyzing)
        } else {
            None
        }
    }
}

pub struct EmotionStore {
    state: Mutex<State>,
    inference: Arc<dyn EmotionInference>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
}

impl EmotionStore {
    pub fn new(
        config: SessionConfig,
        inference: Arc<dyn EmotionInference>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let rng = StdRng::from_rng(&mut rand::rng());
        Self::with_rng(config, inference, clock, rng)
    }

    /// Store with a caller-supplied RNG, for reproducible selection.
    pub fn with_rng(
        config: SessionConfig,
        inference: Arc<dyn EmotionInference>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        let state = State {
            started_at: clock.now(),
            history: EmotionHistory::with_capacity(config.history_capacity),
            detection: DetectionSession::new(config.detection_cooldown),
            scheduler: CaptureScheduler::new(config.capture_interval, config.capture_pulse),
            playback: PlaybackTimer::new(&config, MusicSelector::default()),
            study: StudySelector::default(),
            current_emotion: None,
            current_music: None,
            current_subject: None,
            is_analyzing: false,
            error: None,
            rng,
        };

        info!(
            inference = inference.name(),
            cooldown_secs = config.detection_cooldown.as_secs(),
            session_secs = config.session_duration.as_secs(),
            "Emotion store initialized"
        );

        Self {
            state: Mutex::new(state),
            inference,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Analyze one frame and apply the detection.
    ///
    /// A no-op while a cooldown is active or another analysis is in flight.
    /// With a failover client this only fails on a bad frame; a bare client
    /// error is recorded as the user-facing error and returned.
    pub async fn process_snapshot(&self, frame: FrameData) -> SessionResult<SnapshotOutcome> {
        {
            let mut state = self.lock();
            if let Some(skipped) = state.gate() {
                debug!(outcome = ?skipped, "Snapshot ignored");
                metrics::record_snapshot_skipped(match skipped {
                    SnapshotOutcome::SkippedSessionActive => "session_active",
                    _ => "analyzing",
                });
                return Ok(skipped);
            }
            state.is_analyzing = true;
            state.error = None;
            state.scheduler.acknowledge();
        }

        // Clears the flag on every exit, including when this future is dropped.
        let _analyzing = scopeguard::guard((), |_| {
            self.lock().is_analyzing = false;
        });

        let result = self.inference.detect(&frame).await;
        let now = self.clock.now();

        // Declared after the scope guard, so released before it runs.
        let mut guard = self.lock();
        let state = &mut *guard;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                let err = SessionError::from(e);
                warn!(error = %err, "Emotion analysis failed");
                if let SessionError::Inference(inner) = &err {
                    metrics::record_analysis_failure(inner.kind());
                }
                state.error = Some(err.user_message());
                return Err(err);
            }
        };

        let response = outcome.response;
        let sample = EmotionSample::new(response.emotion, response.confidence, now);
        let label_changed = state
            .current_emotion
            .as_ref()
            .map_or(true, |current| current.emotion != sample.emotion);

        state.detection.activate(now);
        metrics::set_detection_session_active(true);

        state.current_emotion = Some(sample.clone());
        state.current_music = Some(response.music);
        state.history.push(sample.clone());

        state.playback.on_emotion(&sample.emotion, now, &mut state.rng);
        if label_changed || state.current_subject.is_none() {
            state.current_subject = state.study.recommend(&sample.emotion, &mut state.rng);
        }

        let category = sample.category();
        metrics::record_detection(category.as_str(), outcome.source.as_str());
        info!(
            emotion = %sample.emotion,
            category = %category,
            confidence = sample.confidence,
            source = outcome.source.as_str(),
            history_len = state.history.len(),
            "Emotion detected"
        );

        Ok(SnapshotOutcome::Processed(sample))
    }

    /// Pull one frame from `source` and process it.
    ///
    /// Gating is checked before touching the source. Capture failures are
    /// recorded as the current error.
    pub async fn capture_and_process(
        &self,
        source: &dyn FrameSource,
    ) -> SessionResult<SnapshotOutcome> {
        let gate = self.lock().gate();
        if let Some(skipped) = gate {
            return Ok(skipped);
        }

        let bytes = match source.capture_frame().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(SnapshotOutcome::NoFrame),
            Err(e) => {
                warn!(source = source.name(), error = %e, "Frame capture failed");
                self.lock().error = Some(e.to_string());
                return Err(e);
            }
        };

        let frame = FrameData::from_jpeg(&bytes)?;
        self.process_snapshot(frame).await
    }

    /// Advance every timed machine to the current time.
    ///
    /// Returns true when a new capture signal was raised on this tick.
    pub fn tick(&self) -> bool {
        let now = self.clock.now();
        let mut guard = self.lock();
        let state = &mut *guard;

        if state.detection.expire_if_due(now) {
            metrics::set_detection_session_active(false);
        }

        let gated = state.is_analyzing || state.detection.is_active();
        let capture_due = state.scheduler.tick(now, gated);

        for event in state.playback.tick(now, &mut state.rng) {
            if event == PlaybackEvent::Expired {
                debug!("Playback session cleared");
            }
        }

        capture_due
    }

    /// Manually clear the detection session.
    pub fn reset_session(&self) -> bool {
        let cleared = self.lock().detection.reset();
        if cleared {
            metrics::set_detection_session_active(false);
        }
        cleared
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    pub fn should_capture(&self) -> bool {
        let now = self.clock.now();
        self.lock().scheduler.should_capture(now)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let now = self.clock.now();
        let state = self.lock();

        StateSnapshot {
            current_emotion: state.current_emotion.clone(),
            current_music: state.current_music.clone(),
            current_subject: state.current_subject.clone(),
            history: state.history.to_vec(),
            is_analyzing: state.is_analyzing,
            error: state.error.clone(),
            should_capture: state.scheduler.should_capture(now),
            detection_session: state.detection.view(),
            playback: state.playback.view(now),
        }
    }

    /// Retained history, oldest first.
    pub fn history(&self) -> Vec<EmotionSample> {
        self.lock().history.to_vec()
    }

    /// Live recommendations: the playing track first, then the study subject.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let state = self.lock();
        let music = state
            .playback
            .current_item()
            .cloned()
            .map(Recommendation::Music);
        let study = state.current_subject.clone().map(Recommendation::Study);
        music.into_iter().chain(study).collect()
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        let now = self.clock.now();
        let state = self.lock();
        SessionSummary::from_history(&state.history, state.started_at, now)
    }

    pub fn playback(&self) -> PlaybackView {
        let now = self.clock.now();
        self.lock().playback.view(now)
    }

    pub fn toggle_play(&self) -> bool {
        self.lock().playback.toggle_play()
    }

    pub fn skip(&self) -> Option<PlaybackEvent> {
        let now = self.clock.now();
        let mut guard = self.lock();
        let state = &mut *guard;
        state.playback.skip(now, &mut state.rng)
    }

    pub fn set_volume(&self, volume: u32) -> SessionResult<u8> {
        self.lock().playback.set_volume(volume)
    }

    pub fn toggle_mute(&self) -> bool {
        self.lock().playback.toggle_mute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::testing::{
        frame, FailingInference, PendingInference, ScriptedInference, StaticFrameSource,
    };
    use chrono::Duration;
    use emo_ml_client::{
        FailoverInference, FallbackGenerator, HttpInferenceClient, InferenceConfig,
    };

    fn store_with(inference: Arc<dyn EmotionInference>) -> (Arc<EmotionStore>, ManualClock) {
        let clock = ManualClock::at_epoch();
        let store = EmotionStore::with_rng(
            SessionConfig::default(),
            inference,
            Arc::new(clock.clone()),
            StdRng::seed_from_u64(7),
        );
        (Arc::new(store), clock)
    }

    #[tokio::test]
    async fn test_detection_populates_state() {
        let (store, clock) = store_with(Arc::new(ScriptedInference::new(&["excited"])));
        clock.advance(Duration::seconds(5));

        let outcome = store.process_snapshot(frame()).await.unwrap();
        let sample = outcome.sample().unwrap();
        assert_eq!(sample.emotion, "excited");
        assert_eq!(sample.timestamp.timestamp_millis(), 5_000);

        let state = store.snapshot();
        assert_eq!(state.current_emotion.as_ref(), Some(sample));
        assert_eq!(state.current_music.unwrap().title, "Song");
        assert_eq!(state.history.len(), 1);
        assert!(!state.is_analyzing);
        assert!(state.error.is_none());
        assert!(state.detection_session.active);
        assert_eq!(
            state.detection_session.next_allowed_time.unwrap().timestamp_millis(),
            605_000
        );
        assert!(state.playback.current_track.is_some());
        assert_eq!(
            state.current_subject.unwrap().primary,
            "Advanced Programming Projects"
        );
    }

    #[tokio::test]
    async fn test_cooldown_blocks_detections() {
        let (store, clock) = store_with(Arc::new(ScriptedInference::new(&["happy", "sad"])));
        store.process_snapshot(frame()).await.unwrap();

        for secs in [1, 60, 300, 599] {
            clock.set(DateTime::from_timestamp(secs, 0).unwrap());
            store.tick();
            let outcome = store.process_snapshot(frame()).await.unwrap();
            assert_eq!(outcome, SnapshotOutcome::SkippedSessionActive);
            assert_eq!(store.snapshot().current_emotion.unwrap().emotion, "happy");
        }

        clock.set(DateTime::from_timestamp(600, 0).unwrap());
        store.tick();
        assert!(!store.snapshot().detection_session.active);

        let outcome = store.process_snapshot(frame()).await.unwrap();
        assert_eq!(outcome.sample().unwrap().emotion, "sad");
    }

    #[tokio::test]
    async fn test_history_capped_at_capacity() {
        let (store, clock) = store_with(Arc::new(ScriptedInference::new(&["calm"])));

        for i in 0..25 {
            clock.advance(Duration::seconds(1));
            store.reset_session();
            store.process_snapshot(frame()).await.unwrap();
            assert!(store.history().len() <= 20, "overflow at {}", i);
        }

        let history = store.history();
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].timestamp.timestamp(), 6);
        assert_eq!(history[19].timestamp.timestamp(), 25);
    }

    #[tokio::test]
    async fn test_recommendations_follow_detection() {
        let (store, _clock) = store_with(Arc::new(ScriptedInference::new(&["sad"])));
        assert!(store.recommendations().is_empty());

        store.process_snapshot(frame()).await.unwrap();
        let recommendations = store.recommendations();
        assert_eq!(recommendations.len(), 2);
        assert!(matches!(
            &recommendations[0],
            Recommendation::Music(track) if Some(track) == store.playback().current_track.as_ref()
        ));
        assert!(matches!(&recommendations[1], Recommendation::Study(_)));
    }

    #[tokio::test]
    async fn test_oversized_history_capacity_still_capped() {
        let clock = ManualClock::at_epoch();
        let config = SessionConfig {
            history_capacity: 50,
            ..SessionConfig::default()
        };
        let store = EmotionStore::with_rng(
            config,
            Arc::new(ScriptedInference::new(&["calm"])),
            Arc::new(clock.clone()),
            StdRng::seed_from_u64(7),
        );

        for _ in 0..30 {
            clock.advance(Duration::seconds(1));
            store.reset_session();
            store.process_snapshot(frame()).await.unwrap();
        }

        assert_eq!(store.history().len(), 20);
    }

    #[tokio::test]
    async fn test_huge_durations_saturate_instead_of_overflowing() {
        let clock = ManualClock::at_epoch();
        let huge = std::time::Duration::from_secs(9_000_000_000_000);
        let config = SessionConfig {
            detection_cooldown: huge,
            session_duration: huge,
            item_duration: huge,
            activation_delay: huge,
            ..SessionConfig::default()
        };
        let store = EmotionStore::with_rng(
            config,
            Arc::new(ScriptedInference::new(&["happy", "sad"])),
            Arc::new(clock.clone()),
            StdRng::seed_from_u64(7),
        );

        store.process_snapshot(frame()).await.unwrap();
        clock.advance(Duration::days(365));
        store.tick();

        let state = store.snapshot();
        assert!(state.detection_session.active);
        assert!(state.playback.current_track.is_some());
        assert_eq!(
            store.process_snapshot(frame()).await.unwrap(),
            SnapshotOutcome::SkippedSessionActive
        );
    }

    #[tokio::test]
    async fn test_same_category_new_label_swaps_item() {
        let (store, clock) =
            store_with(Arc::new(ScriptedInference::new(&["angry", "frustrated"])));
        store.process_snapshot(frame()).await.unwrap();
        let first = store.playback().current_track.unwrap();

        clock.advance(Duration::seconds(90));
        store.reset_session();
        store.process_snapshot(frame()).await.unwrap();

        let playback = store.playback();
        assert_eq!(playback.emotion_label.as_deref(), Some("frustrated"));
        assert_eq!(playback.session_started_at.unwrap().timestamp_millis(), 0);
        assert_eq!(
            playback.item_started_at.unwrap().timestamp_millis(),
            90_000
        );
        assert_ne!(playback.current_track.unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_emotion_change_keeps_playback_session() {
        let (store, clock) = store_with(Arc::new(ScriptedInference::new(&["excited", "angry"])));
        store.process_snapshot(frame()).await.unwrap();

        clock.advance(Duration::seconds(120));
        store.reset_session();
        store.process_snapshot(frame()).await.unwrap();

        let playback = store.playback();
        assert_eq!(playback.emotion_label.as_deref(), Some("angry"));
        assert_eq!(playback.session_started_at.unwrap().timestamp_millis(), 0);
        assert_eq!(
            store.snapshot().current_subject.unwrap().primary,
            "Basic Mathematics Practice"
        );

        clock.set(DateTime::from_timestamp(600, 0).unwrap());
        store.tick();
        let playback = store.playback();
        assert!(playback.current_track.is_none());
        assert!(playback.session_started_at.is_none());
    }

    #[tokio::test]
    async fn test_inference_failure_sets_error_only() {
        let (store, _clock) = store_with(Arc::new(FailingInference));

        let err = store.process_snapshot(frame()).await.unwrap_err();
        assert!(matches!(err, SessionError::Inference(_)));

        let state = store.snapshot();
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to analyze emotion. Please try again.")
        );
        assert!(!state.is_analyzing);
        assert!(state.current_emotion.is_none());
        assert!(state.history.is_empty());
        assert!(!state.detection_session.active);

        store.clear_error();
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_in_flight_analysis_gates_snapshots() {
        let (store, _clock) = store_with(Arc::new(PendingInference));

        let in_flight = tokio::spawn({
            let store = store.clone();
            async move { store.process_snapshot(frame()).await }
        });
        tokio::task::yield_now().await;
        while !store.snapshot().is_analyzing {
            tokio::task::yield_now().await;
        }

        let outcome = store.process_snapshot(frame()).await.unwrap();
        assert_eq!(outcome, SnapshotOutcome::SkippedAnalyzing);

        // Dropping the request future must release the flag.
        in_flight.abort();
        let _ = in_flight.await;
        assert!(!store.snapshot().is_analyzing);
    }

    #[tokio::test]
    async fn test_scheduler_ticks_and_gates() {
        let (store, clock) = store_with(Arc::new(ScriptedInference::new(&["happy"])));

        assert!(!store.tick());
        clock.advance(Duration::milliseconds(4_000));
        assert!(store.tick());
        assert!(store.should_capture());

        clock.advance(Duration::milliseconds(100));
        store.tick();
        assert!(!store.should_capture());

        store.process_snapshot(frame()).await.unwrap();
        clock.advance(Duration::milliseconds(4_000));
        assert!(!store.tick(), "capture must not fire during a cooldown");
    }

    #[tokio::test]
    async fn test_capture_from_frame_source() {
        let (store, _clock) = store_with(Arc::new(ScriptedInference::new(&["focused"])));
        let camera = StaticFrameSource::default();

        assert_eq!(
            store.capture_and_process(&camera).await.unwrap(),
            SnapshotOutcome::NoFrame
        );

        camera.start().await.unwrap();
        let outcome = store.capture_and_process(&camera).await.unwrap();
        assert_eq!(outcome.sample().unwrap().emotion, "focused");

        // Cooldown: the camera is not touched again.
        let outcome = store.capture_and_process(&camera).await.unwrap();
        assert_eq!(outcome, SnapshotOutcome::SkippedSessionActive);
        assert_eq!(camera.captures.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_denied_camera_surfaces_error() {
        let camera = StaticFrameSource::denied();
        let err = camera.start().await.unwrap_err();
        assert!(err.to_string().contains("check permissions"));
    }

    #[tokio::test]
    async fn test_playback_controls() {
        let (store, _clock) = store_with(Arc::new(ScriptedInference::new(&["sad"])));
        assert!(!store.toggle_play());
        assert!(store.skip().is_none());

        store.process_snapshot(frame()).await.unwrap();
        let first = store.playback().current_track.unwrap();
        assert!(matches!(store.skip(), Some(PlaybackEvent::Skipped(t)) if t.id != first.id));

        assert!(store.toggle_mute());
        assert_eq!(store.set_volume(40).unwrap(), 40);
        assert!(!store.playback().muted);
        assert!(store.set_volume(250).is_err());
    }

    #[tokio::test]
    async fn test_summary_requires_history() {
        let (store, clock) = store_with(Arc::new(ScriptedInference::new(&["happy"])));
        assert!(store.summary().is_none());

        clock.advance(Duration::minutes(3));
        store.process_snapshot(frame()).await.unwrap();
        let summary = store.summary().unwrap();
        assert_eq!(summary.total_detections, 1);
        assert_eq!(summary.duration, 3);
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back() {
        let config = InferenceConfig::with_backend("http://127.0.0.1:1").unwrap();
        let client = HttpInferenceClient::new(&config).unwrap();
        let inference = FailoverInference::new(client, FallbackGenerator::default());
        let (store, _clock) = store_with(Arc::new(inference));

        let started = std::time::Instant::now();
        let outcome = store.process_snapshot(frame()).await.unwrap();
        let elapsed = started.elapsed();

        let sample = outcome.sample().unwrap();
        assert!((0.6..=0.95).contains(&sample.confidence));
        assert!(elapsed >= std::time::Duration::from_secs(1));
        assert!(elapsed < std::time::Duration::from_secs(5));
        assert!(store.snapshot().error.is_none());
    }
}
