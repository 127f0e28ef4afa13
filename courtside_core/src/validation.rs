//! Validation Module - invariant checks over a sequence of projector snapshots
//! ===========================================================================
//!
//! Replays feed snapshots taken at successive instants into a
//! [`ValidationSession`], which checks what must hold between them:
//!
//! - clock and occurred set move in one direction only (until a reset)
//! - the scoreboard equals the sum of occurred points, per team
//! - player points never exceed their team's total
//! - no player's stat line ever goes down
//! - recent plays are the tail of the play-by-play
//! - two snapshots of the same instant are identical
//! - right after a reset the period starts over
//!
//! Usage:
//! ```ignore
//! use courtside_core::validation::ValidationSession;
//!
//! let mut session = ValidationSession::new(720);
//! session.record(&projector.snapshot());
//! // ... advance the clock ...
//! session.record(&projector.snapshot());
//! let report = session.generate_report();
//! assert!(report.passed());
//! ```

use crate::projector::{GameSnapshot, GameStatus};
use crate::roster::TeamSide;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// A broken invariant, with the remaining time it was seen at.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("clock ran backwards: {previous}s -> {current}s remaining")]
    ClockRewound { previous: u32, current: u32 },

    #[error("occurred plays shrank from {previous} to {current} at {remaining}s")]
    OccurredShrank {
        previous: usize,
        current: usize,
        remaining: u32,
    },

    #[error("earlier play-by-play is not a prefix of the later one at {remaining}s")]
    FeedRewritten { remaining: u32 },

    #[error("{team} score {scoreboard} != {events} from occurred plays at {remaining}s")]
    ScoreMismatch {
        team: TeamSide,
        scoreboard: u32,
        events: u32,
        remaining: u32,
    },

    #[error("{team} player points {players} exceed team score {scoreboard} at {remaining}s")]
    PlayerPointsExceedScore {
        team: TeamSide,
        players: u32,
        scoreboard: u32,
        remaining: u32,
    },

    #[error("player {player_id} stat line went down at {remaining}s: {previous:?} -> {current:?}")]
    PlayerStatsDecreased {
        player_id: u32,
        previous: [u32; 6],
        current: [u32; 6],
        remaining: u32,
    },

    #[error("recent plays are not the last {len} plays of the feed at {remaining}s")]
    WindowNotSuffix { len: usize, remaining: u32 },

    #[error("play {sequence_id} at {seconds}s listed with only {remaining}s elapsed")]
    FuturePlay {
        sequence_id: u32,
        seconds: u32,
        remaining: u32,
    },

    #[error("status {status:?} does not match {remaining}s remaining")]
    StatusMismatch { status: GameStatus, remaining: u32 },

    #[error("repeated query at {remaining}s returned a different answer")]
    NonDeterministic { remaining: u32 },

    #[error("period did not restart after reset: {elapsed}s elapsed, {remaining}s remaining")]
    ResetNotFresh { elapsed: u64, remaining: u32 },
}

// =============================================================================
// VALIDATION SESSION
// =============================================================================

/// Collects snapshots and the violations found between them.
pub struct ValidationSession {
    /// Period length the projector was configured with
    period_length_secs: u32,
    /// Last recorded snapshot
    previous: Option<GameSnapshot>,
    /// Set by `mark_reset`; the next snapshot starts a new period
    reset_pending: bool,
    snapshots: usize,
    resets: usize,
    violations: Vec<Violation>,
}

impl ValidationSession {
    /// Creates a session for a projector with the given period length.
    pub fn new(period_length_secs: u32) -> Self {
        Self {
            period_length_secs,
            previous: None,
            reset_pending: false,
            snapshots: 0,
            resets: 0,
            violations: Vec::new(),
        }
    }

    /// Checks one snapshot on its own and against the previous one.
    pub fn record(&mut self, snapshot: &GameSnapshot) {
        self.snapshots += 1;
        self.check_consistency(snapshot);

        if self.reset_pending {
            self.check_fresh_period(snapshot);
            self.reset_pending = false;
        } else if let Some(previous) = self.previous.take() {
            self.check_progress(&previous, snapshot);
        }

        self.previous = Some(snapshot.clone());
    }

    /// Checks one snapshot on its own, without ordering it against others.
    ///
    /// For snapshots taken on several threads, where no order is known.
    pub fn record_unordered(&mut self, snapshot: &GameSnapshot) {
        self.snapshots += 1;
        self.check_consistency(snapshot);
    }

    /// Records two snapshots taken at the same instant.
    pub fn record_repeat(&mut self, first: &GameSnapshot, second: &GameSnapshot) {
        if first != second {
            self.violations.push(Violation::NonDeterministic {
                remaining: first.clock.remaining_seconds,
            });
        }
        self.record(first);
    }

    /// Tells the session the timer was just reset.
    pub fn mark_reset(&mut self) {
        self.resets += 1;
        self.reset_pending = true;
    }

    /// Number of violations found so far.
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Builds the final report.
    pub fn generate_report(&self) -> ValidationReport {
        ValidationReport {
            snapshots: self.snapshots,
            resets: self.resets,
            violations: self.violations.clone(),
        }
    }

    fn check_consistency(&mut self, snapshot: &GameSnapshot) {
        let remaining = snapshot.clock.remaining_seconds;

        let expected_status = if remaining == 0 {
            GameStatus::Final
        } else {
            GameStatus::InProgress
        };
        if snapshot.status != expected_status {
            self.violations.push(Violation::StatusMismatch {
                status: snapshot.status,
                remaining,
            });
        }

        if let Some(play) = snapshot
            .play_by_play
            .iter()
            .find(|p| p.seconds_remaining < remaining)
        {
            self.violations.push(Violation::FuturePlay {
                sequence_id: play.sequence_id,
                seconds: play.seconds_remaining,
                remaining,
            });
        }

        for team in TeamSide::BOTH {
            let scoreboard = snapshot.scoreboard.get(team);

            let events: u32 = snapshot
                .play_by_play
                .iter()
                .filter(|p| p.team == team)
                .map(|p| u32::from(p.points))
                .sum();
            if events != scoreboard {
                self.violations.push(Violation::ScoreMismatch {
                    team,
                    scoreboard,
                    events,
                    remaining,
                });
            }

            let players: u32 = snapshot
                .box_score
                .iter()
                .filter(|l| l.team == team)
                .map(|l| l.points)
                .sum();
            if players > scoreboard {
                self.violations.push(Violation::PlayerPointsExceedScore {
                    team,
                    players,
                    scoreboard,
                    remaining,
                });
            }
        }

        let len = snapshot.recent_plays.len();
        let feed = &snapshot.play_by_play;
        let is_suffix = len <= feed.len()
            && snapshot
                .recent_plays
                .iter()
                .zip(&feed[feed.len() - len..])
                .all(|(play, entry)| play.sequence_id == entry.sequence_id);
        if !is_suffix {
            self.violations
                .push(Violation::WindowNotSuffix { len, remaining });
        }
    }

    fn check_progress(&mut self, previous: &GameSnapshot, current: &GameSnapshot) {
        let remaining = current.clock.remaining_seconds;

        if remaining > previous.clock.remaining_seconds {
            self.violations.push(Violation::ClockRewound {
                previous: previous.clock.remaining_seconds,
                current: remaining,
            });
            return;
        }

        if current.occurred_count() < previous.occurred_count() {
            self.violations.push(Violation::OccurredShrank {
                previous: previous.occurred_count(),
                current: current.occurred_count(),
                remaining,
            });
            return;
        }

        if current.play_by_play[..previous.occurred_count()] != previous.play_by_play[..] {
            self.violations.push(Violation::FeedRewritten { remaining });
        }

        for line in &current.box_score {
            let Some(before) = previous
                .box_score
                .iter()
                .find(|l| l.player_id == line.player_id)
            else {
                continue;
            };
            let (was, now) = (before.counts(), line.counts());
            if now.iter().zip(&was).any(|(n, w)| n < w) {
                self.violations.push(Violation::PlayerStatsDecreased {
                    player_id: line.player_id,
                    previous: was,
                    current: now,
                    remaining,
                });
            }
        }
    }

    fn check_fresh_period(&mut self, snapshot: &GameSnapshot) {
        let clock = &snapshot.clock;
        let fresh = clock.elapsed_seconds == 0
            && clock.remaining_seconds == self.period_length_secs
            && snapshot
                .play_by_play
                .iter()
                .all(|p| p.seconds_remaining >= self.period_length_secs);

        if !fresh {
            self.violations.push(Violation::ResetNotFresh {
                elapsed: clock.elapsed_seconds,
                remaining: clock.remaining_seconds,
            });
        }
    }
}

// =============================================================================
// VALIDATION REPORT
// =============================================================================

/// Outcome of a validation session.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub snapshots: usize,
    pub resets: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// True if no invariant was broken.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Print formatted report to console
    pub fn print(&self) {
        println!();
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║               COURTSIDE VALIDATION REPORT                    ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ Snapshots:             {:>10}                            ║", self.snapshots);
        println!("║ Resets:                {:>10}                            ║", self.resets);
        println!("║ Violations:            {:>10}                            ║", self.violations.len());
        println!("╚══════════════════════════════════════════════════════════════╝");

        for violation in self.violations.iter().take(10) {
            println!("  - {}", violation);
        }
        if self.violations.len() > 10 {
            println!("  ... and {} more", self.violations.len() - 10);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
