//! The game clock, projected from an anchor timestamp and "now".
//!
//! There is no ticking state anywhere: remaining time is recomputed on every
//! query as `period_length - (now - anchor)`, clamped at both ends. Once the
//! clock reaches zero the period is over and stays over until the anchor is
//! moved by a timer reset.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Snapshot of the simulated clock at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClockState {
    /// Whole seconds since the anchor (0 if "now" precedes the anchor)
    pub elapsed_seconds: u64,

    /// Seconds left in the period, in `[0, period_length]`
    pub remaining_seconds: u32,

    /// Period number (always the single modeled period)
    pub period: u8,
}

impl GameClockState {
    /// True once the period has run out.
    pub fn is_period_over(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Whole minutes of remaining time.
    pub fn minutes(&self) -> u32 {
        self.remaining_seconds / 60
    }

    /// Seconds part of remaining time.
    pub fn seconds(&self) -> u32 {
        self.remaining_seconds % 60
    }

    /// Remaining time formatted as `MM:SS`.
    pub fn label(&self) -> String {
        format_clock(self.remaining_seconds)
    }
}

/// Formats seconds as a zero-padded `MM:SS` clock label.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Converts (anchor, now) into a [`GameClockState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockProjector {
    period_length_secs: u32,
    period: u8,
}

impl ClockProjector {
    /// Creates a projector for a period of the given length.
    pub fn new(period_length_secs: u32, period: u8) -> Self {
        Self {
            period_length_secs,
            period,
        }
    }

    /// Length of the period in seconds.
    pub fn period_length(&self) -> u32 {
        self.period_length_secs
    }

    /// Projects the clock.
    ///
    /// `elapsed = max(0, now - anchor)` truncated to whole seconds,
    /// `remaining = max(0, period_length - elapsed)`.
    pub fn project(&self, anchor: SystemTime, now: SystemTime) -> GameClockState {
        let elapsed_seconds = now
            .duration_since(anchor)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let remaining_seconds = u64::from(self.period_length_secs)
            .saturating_sub(elapsed_seconds) as u32;

        GameClockState {
            elapsed_seconds,
            remaining_seconds,
            period: self.period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn anchor() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_744_584_000)
    }

    #[test]
    fn test_project_at_anchor() {
        let projector = ClockProjector::new(720, 1);
        let state = projector.project(anchor(), anchor());

        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.remaining_seconds, 720);
        assert_eq!(state.period, 1);
        assert_eq!(state.label(), "12:00");
    }

    #[test]
    fn test_project_truncates_to_whole_seconds() {
        let projector = ClockProjector::new(720, 1);
        let state = projector.project(anchor(), anchor() + Duration::from_millis(81_999));

        assert_eq!(state.elapsed_seconds, 81);
        assert_eq!(state.remaining_seconds, 639);
        assert_eq!((state.minutes(), state.seconds()), (10, 39));
        assert_eq!(state.label(), "10:39");
    }

    #[test]
    fn test_project_clamps_after_period_end() {
        let projector = ClockProjector::new(720, 1);
        let state = projector.project(anchor(), anchor() + Duration::from_secs(5_000));

        assert_eq!(state.elapsed_seconds, 5_000);
        assert_eq!(state.remaining_seconds, 0);
        assert!(state.is_period_over());
        assert_eq!(state.label(), "00:00");
    }

    #[test]
    fn test_project_now_before_anchor() {
        let projector = ClockProjector::new(720, 1);
        let state = projector.project(anchor(), anchor() - Duration::from_secs(30));

        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.remaining_seconds, 720);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(640), "10:40");
    }
}
