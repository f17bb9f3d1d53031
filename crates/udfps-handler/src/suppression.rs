//! Finger-up suppression after a successful authentication
//!
//! Right after an unlock the sensor may still report the finger lifting.
//! Re-issuing the deactivate sequence at that point makes the panel flicker,
//! so finger events are ignored until the window expires.

use std::time::{Duration, Instant};

/// A "suppressed until" deadline, compared on read
#[derive(Debug, Clone)]
pub struct SuppressionWindow {
    duration: Duration,
    until: Option<Instant>,
}

impl SuppressionWindow {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Start (or restart) the window now
    pub fn arm(&mut self) {
        self.arm_at(Instant::now());
    }

    pub fn arm_at(&mut self, now: Instant) {
        self.until = Some(now + self.duration);
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Instant::now())
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}
