//! The session driver: one timer task that ticks the store.
//!
//! A single `tokio::time::interval` advances the detection session, the
//! capture scheduler and the playback timer. When a frame source is
//! attached, raised capture signals are served from it automatically.
//! Captures run in a `JoinSet` owned by the loop, so aborting the driver
//! cancels everything it started.

use std::sync::Arc;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::frame_source::FrameSource;
use crate::store::{EmotionStore, SnapshotOutcome};

pub struct SessionDriver {
    handle: Option<JoinHandle<()>>,
}

impl SessionDriver {
    /// Spawn the tick loop for `store`.
    pub fn spawn(store: Arc<EmotionStore>, source: Option<Arc<dyn FrameSource>>) -> Self {
        let handle = tokio::spawn(Self::run(store, source));
        Self {
            handle: Some(handle),
        }
    }

    async fn run(store: Arc<EmotionStore>, source: Option<Arc<dyn FrameSource>>) {
        let period = store.config().tick_interval;
        info!(
            tick_ms = period.as_millis() as u64,
            frame_source = source.as_ref().map(|s| s.name()).unwrap_or("none"),
            "Session driver started"
        );

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut captures = JoinSet::new();

        loop {
            ticker.tick().await;

            while let Some(done) = captures.try_join_next() {
                if let Err(e) = done {
                    warn!("Capture task failed: {}", e);
                }
            }

            let capture_due = store.tick();
            let Some(source) = source.as_ref().filter(|_| capture_due) else {
                continue;
            };

            let store = store.clone();
            let source = source.clone();
            captures.spawn(async move {
                match store.capture_and_process(source.as_ref()).await {
                    Ok(SnapshotOutcome::Processed(sample)) => {
                        debug!(emotion = %sample.emotion, "Automatic capture processed");
                    }
                    Ok(outcome) => debug!(outcome = ?outcome, "Automatic capture skipped"),
                    Err(e) => warn!(error = %e, "Automatic capture failed"),
                }
            });
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking. No timer fires after this returns.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Session driver stopped");
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
