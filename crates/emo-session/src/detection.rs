//! Detection session (cooldown) state machine.
//!
//! `Idle -> Active(started_at, next_allowed_at) -> Idle`. A successful
//! detection activates the session; it returns to idle once the wall clock
//! reaches `next_allowed_at`, or immediately on a manual reset. While active
//! no capture is signalled and new snapshots are ignored.

use chrono::{DateTime, Utc};
use tracing::info;

use emo_models::DetectionSessionView;

use crate::clock::after;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Active {
        started_at: DateTime<Utc>,
        next_allowed_at: DateTime<Utc>,
    },
}

/// Cooldown window following a successful detection.
#[derive(Debug, Clone)]
pub struct DetectionSession {
    state: State,
    cooldown: std::time::Duration,
}

impl DetectionSession {
    pub fn new(cooldown: std::time::Duration) -> Self {
        Self {
            state: State::Idle,
            cooldown,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    /// Start a cooldown window at `now`.
    ///
    /// Ignored while a window is already running.
    pub fn activate(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_active() {
            return false;
        }

        let next_allowed_at = after(now, self.cooldown);
        self.state = State::Active {
            started_at: now,
            next_allowed_at,
        };
        info!(
            next_allowed_at = %next_allowed_at,
            cooldown_secs = self.cooldown.as_secs(),
            "Detection session started"
        );
        true
    }

    /// Return to idle if the window has elapsed. Returns true on transition.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            State::Active {
                next_allowed_at, ..
            } if now >= next_allowed_at => {
                self.state = State::Idle;
                info!("Detection session completed, ready for next detection");
                true
            }
            _ => false,
        }
    }

    /// Manual override: drop any timing state immediately.
    pub fn reset(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = State::Idle;
        if was_active {
            info!("Detection session cleared manually");
        }
        was_active
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            State::Active { started_at, .. } => Some(started_at),
            State::Idle => None,
        }
    }

    pub fn next_allowed_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            State::Active {
                next_allowed_at, ..
            } => Some(next_allowed_at),
            State::Idle => None,
        }
    }

    pub fn view(&self) -> DetectionSessionView {
        DetectionSessionView {
            active: self.is_active(),
            start_time: self.started_at(),
            next_allowed_time: self.next_allowed_at(),
        }
    }
}
