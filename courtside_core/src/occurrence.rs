//! Splits the compiled script into plays that have happened and plays that
//! have not, for a given remaining-time value.
//!
//! A play has occurred once the clock has run down to (or past) the time it
//! was recorded at: `event.seconds_remaining >= remaining`. The split is
//! recomputed from the whole script every time and keeps authoring order, so
//! as `remaining` falls the occurred set only ever grows.

use crate::script::PlayEvent;

/// Stateless occurrence filter.
pub struct EventFilter;

impl EventFilter {
    /// True if `event` has happened when `remaining` seconds are left.
    pub fn has_occurred(event: &PlayEvent, remaining: u32) -> bool {
        event.seconds_remaining >= remaining
    }

    /// All occurred events, in authoring order.
    pub fn occurred(script: &[PlayEvent], remaining: u32) -> Vec<&PlayEvent> {
        script
            .iter()
            .filter(|e| Self::has_occurred(e, remaining))
            .collect()
    }

    /// All events still to come, in authoring order.
    pub fn pending(script: &[PlayEvent], remaining: u32) -> Vec<&PlayEvent> {
        script
            .iter()
            .filter(|e| !Self::has_occurred(e, remaining))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::TeamSide;
    use crate::script::PlayCategory;

    fn event(sequence_id: u32, seconds_remaining: u32) -> PlayEvent {
        PlayEvent {
            sequence_id,
            clock_label: crate::clock::format_clock(seconds_remaining),
            seconds_remaining,
            description: format!("play {}", sequence_id),
            team: TeamSide::Home,
            points: 0,
            category: PlayCategory::Other,
        }
    }

    fn script() -> Vec<PlayEvent> {
        vec![event(1, 720), event(2, 640), event(3, 640), event(4, 600), event(5, 0)]
    }

    fn ids(events: &[&PlayEvent]) -> Vec<u32> {
        events.iter().map(|e| e.sequence_id).collect()
    }

    #[test]
    fn test_occurred_includes_ties() {
        let script = script();
        assert_eq!(ids(&EventFilter::occurred(&script, 720)), vec![1]);
        assert_eq!(ids(&EventFilter::occurred(&script, 641)), vec![1]);
        assert_eq!(ids(&EventFilter::occurred(&script, 640)), vec![1, 2, 3]);
        assert_eq!(ids(&EventFilter::occurred(&script, 0)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_pending_is_complement() {
        let script = script();
        for remaining in [720, 700, 640, 639, 1, 0] {
            let occurred = EventFilter::occurred(&script, remaining);
            let pending = EventFilter::pending(&script, remaining);
            assert_eq!(occurred.len() + pending.len(), script.len());
            assert!(pending.iter().all(|e| e.seconds_remaining < remaining));
        }
    }

    #[test]
    fn test_occurred_grows_as_clock_runs_down() {
        let script = script();
        let mut previous = 0;
        for remaining in (0..=720).rev() {
            let count = EventFilter::occurred(&script, remaining).len();
            assert!(count >= previous);
            previous = count;
        }
    }
}
