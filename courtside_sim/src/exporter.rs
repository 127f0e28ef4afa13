//! JSON exporter for replay timelines.
//!
//! Exports projector snapshots as JSON frames for offline inspection.

use courtside_core::{GameSnapshot, GameStatus};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single frame of replay data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineFrame {
    /// Virtual time in seconds since the replay started
    pub time_sec: f64,

    /// Remaining game time, `MM:SS`
    pub clock: String,

    pub remaining_seconds: u32,
    pub status: GameStatus,
    pub home_score: u32,
    pub away_score: u32,

    /// Number of plays that have happened
    pub occurred: usize,

    /// Description of the latest play, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_play: Option<String>,

    /// Events (resets, etc.)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<TimelineEvent>,
}

impl TimelineFrame {
    /// Builds a frame from a projector snapshot.
    pub fn from_snapshot(time_sec: f64, snapshot: &GameSnapshot) -> Self {
        Self {
            time_sec,
            clock: snapshot.clock.label(),
            remaining_seconds: snapshot.clock.remaining_seconds,
            status: snapshot.status,
            home_score: snapshot.scoreboard.home,
            away_score: snapshot.scoreboard.away,
            occurred: snapshot.occurred_count(),
            last_play: snapshot
                .play_by_play
                .last()
                .map(|entry| entry.description.clone()),
            events: Vec::new(),
        }
    }

    /// Attaches an event to this frame.
    pub fn with_event(mut self, message: impl Into<String>) -> Self {
        self.events.push(TimelineEvent {
            message: message.into(),
            level: None,
        });
        self
    }
}

/// Replay event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Complete replay export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Game that was replayed
    pub game_id: String,

    /// Duration in seconds
    pub duration_sec: f64,

    /// All frames
    pub frames: Vec<TimelineFrame>,

    /// Final results
    pub passed: bool,

    /// Number of invariant violations found
    pub violations: usize,
}

impl TimelineExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64, game_id: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            game_id: game_id.to_string(),
            duration_sec: 0.0,
            frames: Vec::new(),
            passed: false,
            violations: 0,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: TimelineFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, violations: usize) {
        self.passed = passed;
        self.violations = violations;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
