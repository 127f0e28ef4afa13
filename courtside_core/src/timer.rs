//! The timer anchor: the one piece of mutable state in the projector.
//!
//! Readers take a shared lock and copy the anchor out once per query, so a
//! query never sees two different anchors. A reset replaces the anchor under
//! the write lock and is idempotent at the same instant.

use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;
use tracing::info;

/// Holds the instant the simulated period started.
#[derive(Debug)]
pub struct TimerControl {
    anchor: RwLock<SystemTime>,
}

impl TimerControl {
    /// Creates a timer anchored at `anchor`.
    pub fn new(anchor: SystemTime) -> Self {
        Self {
            anchor: RwLock::new(anchor),
        }
    }

    /// Returns the current anchor.
    pub fn anchor(&self) -> SystemTime {
        // A SystemTime cannot be left half-written, so a poisoned lock still
        // holds a valid value.
        *self.anchor.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the anchor to `now`, restarting the period, and returns it.
    pub fn reset(&self, now: SystemTime) -> SystemTime {
        let mut anchor = self.anchor.write().unwrap_or_else(PoisonError::into_inner);
        *anchor = now;
        info!("Timer anchor reset");
        now
    }
}
