//! Script compilation: authored `(clock, description)` pairs to [`PlayEvent`]s.
//!
//! Compilation runs once. Each entry gets its clock parsed, a team and a
//! point value inferred from the free text, and a category tag for the
//! play-by-play feed. Entries with a malformed clock are dropped with a
//! warning; nothing here is fatal.
//!
//! # Point inference
//!
//! The first matching rule wins, so a description never scores twice:
//!
//! ```text
//! "MISS ..." prefix                   -> 0
//! 3PT / 3-pt / 3 pt                   -> 3
//! Free Throw (not missed)             -> 1
//! Dunk / Layup / Jump Shot / Hook Shot -> 2
//! anything else                       -> 0
//! ```

use crate::error::ScriptError;
use crate::roster::{find_word, word_pattern, GameInfo, Roster, TeamSide};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

static THREE_POINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b3\s?-?\s?pt\b").unwrap());
static FREE_THROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfree throw\b").unwrap());
static FIELD_GOAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:dunk|layup|jump shot|hook shot)\b").unwrap());
static PERIOD_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:Q\d\s+(?:start|end)|(?:start|end) of (?:the )?\w+ (?:quarter|period))")
        .unwrap()
});

/// One authored line of the script, before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Game clock when the play happened, `MM:SS`
    pub clock: String,

    /// Play text in stats-feed style, e.g. `"Clingan REBOUND (Off:0 Def:1)"`
    pub description: String,
}

impl ScriptEntry {
    /// Creates a script entry.
    pub fn new(clock: &str, description: &str) -> Self {
        Self {
            clock: clock.to_string(),
            description: description.to_string(),
        }
    }
}

impl From<(&str, &str)> for ScriptEntry {
    fn from((clock, description): (&str, &str)) -> Self {
        Self::new(clock, description)
    }
}

/// Coarse play type, used to tag play-by-play entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayCategory {
    PeriodMarker,
    JumpBall,
    Score,
    Miss,
    Rebound,
    Steal,
    Block,
    Turnover,
    Foul,
    Timeout,
    Substitution,
    Other,
}

/// A compiled, immutable script event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// 1-based position in authoring order
    pub sequence_id: u32,

    /// Original clock text, `MM:SS`
    pub clock_label: String,

    /// Seconds left in the period when the play happened
    pub seconds_remaining: u32,

    pub description: String,

    /// Inferred team (HOME when nothing in the text identifies one)
    pub team: TeamSide,

    /// Inferred point value, one of 0, 1, 2, 3
    pub points: u8,

    pub category: PlayCategory,
}

impl PlayEvent {
    /// True if the play put points on the board.
    pub fn is_scoring(&self) -> bool {
        self.points > 0
    }
}

/// Parses an `MM:SS` clock label into seconds.
///
/// Minutes may have any number of digits; seconds must be two digits below 60.
pub fn parse_clock_label(label: &str) -> Result<u32, ScriptError> {
    let trimmed = label.trim();
    let (minutes, seconds) = trimmed
        .split_once(':')
        .ok_or_else(|| ScriptError::malformed(label))?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(minutes) || seconds.len() != 2 || !all_digits(seconds) {
        return Err(ScriptError::malformed(label));
    }

    let minutes: u32 = minutes.parse().map_err(|_| ScriptError::malformed(label))?;
    let seconds: u32 = seconds.parse().map_err(|_| ScriptError::malformed(label))?;
    if seconds >= 60 {
        return Err(ScriptError::malformed(label));
    }

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(|| ScriptError::malformed(label))
}

/// True if the description records a missed attempt.
pub fn is_miss(description: &str) -> bool {
    description.trim_start().starts_with("MISS")
}

/// Infers the point value of a play from its description.
pub fn infer_points(description: &str) -> u8 {
    if is_miss(description) {
        0
    } else if THREE_POINT.is_match(description) {
        3
    } else if FREE_THROW.is_match(description) {
        1
    } else if FIELD_GOAL.is_match(description) {
        2
    } else {
        0
    }
}

/// Tags a play with its coarse category.
pub fn categorize(description: &str, points: u8) -> PlayCategory {
    let lower = description.to_lowercase();

    if PERIOD_MARKER.is_match(description.trim()) {
        PlayCategory::PeriodMarker
    } else if lower.contains("jump ball") {
        PlayCategory::JumpBall
    } else if is_miss(description) {
        PlayCategory::Miss
    } else if points > 0 {
        PlayCategory::Score
    } else if lower.contains("rebound") {
        PlayCategory::Rebound
    } else if description.contains("STEAL") {
        PlayCategory::Steal
    } else if description.contains("BLOCK") {
        PlayCategory::Block
    } else if lower.contains("turnover") {
        PlayCategory::Turnover
    } else if lower.contains("foul") {
        PlayCategory::Foul
    } else if lower.contains("timeout") {
        PlayCategory::Timeout
    } else if description.trim_start().starts_with("SUB:") {
        PlayCategory::Substitution
    } else {
        PlayCategory::Other
    }
}

/// Compiles authored script entries against a game and roster.
pub struct ScriptCompiler<'a> {
    roster: &'a Roster,

    /// Whole-word team patterns, home tokens before away tokens so equal
    /// positions resolve to HOME
    team_patterns: Vec<(TeamSide, Regex)>,
}

impl<'a> ScriptCompiler<'a> {
    /// Creates a compiler for the given game and roster.
    pub fn new(game: &'a GameInfo, roster: &'a Roster) -> Self {
        let team_patterns = TeamSide::BOTH
            .into_iter()
            .flat_map(|side| {
                game.team(side)
                    .tokens()
                    .into_iter()
                    .filter_map(move |token| word_pattern(token).map(|re| (side, re)))
            })
            .collect();

        Self {
            roster,
            team_patterns,
        }
    }

    /// Compiles every entry, dropping malformed ones.
    ///
    /// The output keeps authoring order; `sequence_id` counts kept entries
    /// from 1.
    pub fn compile(&self, entries: &[ScriptEntry]) -> Vec<PlayEvent> {
        let mut events: Vec<PlayEvent> = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let sequence_id = events.len() as u32 + 1;
            match self.compile_entry(sequence_id, entry) {
                Ok(event) => {
                    if let Some(previous) = events.last() {
                        if event.seconds_remaining > previous.seconds_remaining {
                            warn!(
                                "Script entry {} ({}) runs the clock backwards after {}; keeping authoring order",
                                index, event.clock_label, previous.clock_label
                            );
                        }
                    }
                    events.push(event);
                }
                Err(e) => {
                    warn!("Dropping script entry {} {:?}: {}", index, entry.description, e);
                }
            }
        }

        debug!("Compiled {} of {} script entries", events.len(), entries.len());
        events
    }

    /// Compiles a single entry.
    pub fn compile_entry(
        &self,
        sequence_id: u32,
        entry: &ScriptEntry,
    ) -> Result<PlayEvent, ScriptError> {
        let seconds_remaining = parse_clock_label(&entry.clock)?;
        let description = entry.description.trim().to_string();
        let points = infer_points(&description);

        Ok(PlayEvent {
            sequence_id,
            clock_label: entry.clock.trim().to_string(),
            seconds_remaining,
            team: self.infer_team(&description),
            points,
            category: categorize(&description, points),
            description,
        })
    }

    /// Infers which team a play belongs to.
    ///
    /// Explicit team tokens win, earliest in the text first (ties go to
    /// HOME); then the earliest-mentioned roster player; then HOME. The HOME
    /// fallback covers neutral events such as period markers.
    pub fn infer_team(&self, description: &str) -> TeamSide {
        let mut earliest: Option<(usize, TeamSide)> = None;
        for (side, re) in &self.team_patterns {
            if let Some(pos) = find_word(re, description) {
                match earliest {
                    Some((best, _)) if best <= pos => {}
                    _ => earliest = Some((pos, *side)),
                }
            }
        }
        if let Some((_, side)) = earliest {
            return side;
        }

        self.roster
            .first_mentioned(description)
            .map(|entry| entry.team)
            .unwrap_or(TeamSide::Home)
    }
}
