//! Capture scheduler.
//!
//! On a fixed cadence raises a one-shot "capture now" signal that clears
//! itself after a short pulse. Ticks that land while capture is gated are
//! skipped outright; missed ticks never accumulate.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::clock::after;

#[derive(Debug, Clone)]
pub struct CaptureScheduler {
    interval: std::time::Duration,
    pulse: std::time::Duration,
    next_due: Option<DateTime<Utc>>,
    signal_until: Option<DateTime<Utc>>,
}

impl CaptureScheduler {
    pub fn new(interval: std::time::Duration, pulse: std::time::Duration) -> Self {
        Self {
            interval: interval.max(std::time::Duration::from_millis(1)),
            pulse,
            next_due: None,
            signal_until: None,
        }
    }

    /// Advance the cadence to `now`.
    ///
    /// `gated` is true while an analysis is in flight or a detection session
    /// is active. Returns true when a new signal was raised on this call.
    pub fn tick(&mut self, now: DateTime<Utc>, gated: bool) -> bool {
        if let Some(until) = self.signal_until {
            if now >= until {
                self.signal_until = None;
            }
        }

        let due = match self.next_due {
            // The first cadence tick lands one interval after start.
            None => {
                self.next_due = Some(after(now, self.interval));
                return false;
            }
            Some(due) => due,
        };

        if now < due {
            return false;
        }

        // Skip any intervals missed since `due`; only one tick fires.
        let mut next = after(due, self.interval);
        while next <= now && next < DateTime::<Utc>::MAX_UTC {
            next = after(next, self.interval);
        }
        self.next_due = Some(next);

        if gated {
            trace!("Capture tick skipped while gated");
            return false;
        }

        self.signal_until = Some(after(now, self.pulse));
        true
    }

    /// Whether the capture signal is currently raised.
    pub fn should_capture(&self, now: DateTime<Utc>) -> bool {
        self.signal_until.is_some_and(|until| now < until)
    }

    /// Lower the signal once a capture has been taken.
    pub fn acknowledge(&mut self) {
        self.signal_until = None;
    }
}
