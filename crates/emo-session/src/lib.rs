//! Emotion session engine.
//!
//! This crate provides:
//! - Capture scheduling gated by analysis and cooldown state
//! - The detection session (cooldown) state machine
//! - A bounded emotion history and session summaries
//! - Non-repeating music and study-subject selection
//! - The playback session timer
//! - [`EmotionStore`], the single owner of all of the above, and
//!   [`SessionDriver`], the one timer task that ticks it

pub mod catalog;
pub mod clock;
pub mod config;
pub mod detection;
pub mod driver;
pub mod error;
pub mod frame_source;
pub mod history;
pub mod metrics;
pub mod playback;
pub mod scheduler;
pub mod selector;
pub mod store;
pub mod summary;

#[cfg(test)]
mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use detection::DetectionSession;
pub use driver::SessionDriver;
pub use error::{SessionError, SessionResult};
pub use frame_source::FrameSource;
pub use history::EmotionHistory;
pub use playback::{PlaybackEvent, PlaybackTimer};
pub use scheduler::CaptureScheduler;
pub use selector::{MusicSelector, RecentlyUsed, StudySelector};
pub use store::{EmotionStore, SnapshotOutcome};
pub use summary::SessionSummary;
