//! Feed composition: scoreboard, box score, play-by-play, and the derived
//! views built on top of them.
//!
//! Every function here takes the occurred subset (or stat lines derived from
//! it) and returns fresh values. Nothing is cached between calls.

use crate::roster::{GameInfo, Roster, TeamSide};
use crate::script::{PlayCategory, PlayEvent};
use crate::stats::{StatAggregator, StatLine};
use serde::{Deserialize, Serialize};

/// Points needed in a category for a triple-double.
pub const TRIPLE_DOUBLE_TARGET: u32 = 10;

// ============================================================================
// Output Types
// ============================================================================

/// Team totals of occurred points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub home: u32,
    pub away: u32,
}

impl Scoreboard {
    /// Sums occurred points per team.
    pub fn from_events<'e, I>(occurred: I) -> Self
    where
        I: IntoIterator<Item = &'e PlayEvent>,
    {
        let mut board = Self::default();
        for event in occurred {
            board.record(event);
        }
        board
    }

    /// Adds one play's points to its team.
    pub fn record(&mut self, event: &PlayEvent) {
        match event.team {
            TeamSide::Home => self.home += u32::from(event.points),
            TeamSide::Away => self.away += u32::from(event.points),
        }
    }

    /// Score for one side.
    pub fn get(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    /// Absolute margin between the teams.
    pub fn difference(&self) -> u32 {
        self.home.abs_diff(self.away)
    }
}

/// One occurred play with the score as it stood right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayByPlayEntry {
    pub sequence_id: u32,
    pub period: u8,
    pub clock: String,
    pub seconds_remaining: u32,
    pub team: TeamSide,
    pub description: String,
    pub points: u8,
    pub category: PlayCategory,
    pub home_score: u32,
    pub away_score: u32,
}

/// Top scorer of each team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaders {
    pub home: Option<StatLine>,
    pub away: Option<StatLine>,
}

/// How close a player is to a triple-double.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleDoubleProgress {
    pub player_id: u32,
    pub name: String,
    pub team: TeamSide,
    pub current: CategoryTriple,
    /// Amount still missing in each category, floored at zero
    pub needed: CategoryTriple,
    /// Percent of the target reached in each category, capped at 100
    pub progress: CategoryTriple,
    pub is_triple_double: bool,
}

/// Points, rebounds, and assists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTriple {
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
}

impl CategoryTriple {
    fn map(self, f: impl Fn(u32) -> u32) -> Self {
        Self {
            points: f(self.points),
            rebounds: f(self.rebounds),
            assists: f(self.assists),
        }
    }
}

// ============================================================================
// Composer
// ============================================================================

/// Builds feed views for one game.
pub struct FeedComposer<'a> {
    game: &'a GameInfo,
    roster: &'a Roster,
    period: u8,
}

impl<'a> FeedComposer<'a> {
    /// Creates a composer for the given game and roster.
    pub fn new(game: &'a GameInfo, roster: &'a Roster, period: u8) -> Self {
        Self {
            game,
            roster,
            period,
        }
    }

    /// The game this composer describes.
    pub fn game(&self) -> &GameInfo {
        self.game
    }

    /// Team totals.
    pub fn scoreboard(&self, occurred: &[&PlayEvent]) -> Scoreboard {
        Scoreboard::from_events(occurred.iter().copied())
    }

    /// Stat lines for the whole roster, in roster order.
    pub fn box_score(&self, occurred: &[&PlayEvent]) -> Vec<StatLine> {
        StatAggregator::new(self.roster).aggregate(occurred.iter().copied())
    }

    /// Every occurred play with the running score after it.
    pub fn play_by_play(&self, occurred: &[&PlayEvent]) -> Vec<PlayByPlayEntry> {
        let mut board = Scoreboard::default();

        occurred
            .iter()
            .map(|event| {
                board.record(event);
                PlayByPlayEntry {
                    sequence_id: event.sequence_id,
                    period: self.period,
                    clock: event.clock_label.clone(),
                    seconds_remaining: event.seconds_remaining,
                    team: event.team,
                    description: event.description.clone(),
                    points: event.points,
                    category: event.category,
                    home_score: board.home,
                    away_score: board.away,
                }
            })
            .collect()
    }

    /// Per-team points leaders.
    pub fn leaders(&self, lines: &[StatLine]) -> Leaders {
        Leaders {
            home: leader_of(lines, TeamSide::Home).cloned(),
            away: leader_of(lines, TeamSide::Away).cloned(),
        }
    }

    /// Progress toward a triple-double, or `None` for an unknown player.
    pub fn triple_double_progress(
        &self,
        lines: &[StatLine],
        player_id: u32,
    ) -> Option<TripleDoubleProgress> {
        let line = lines.iter().find(|l| l.player_id == player_id)?;

        let current = CategoryTriple {
            points: line.points,
            rebounds: line.rebounds,
            assists: line.assists,
        };
        let needed = current.map(|value| TRIPLE_DOUBLE_TARGET.saturating_sub(value));
        let progress = current.map(|value| (value * 100 / TRIPLE_DOUBLE_TARGET).min(100));
        let is_triple_double = needed.points == 0 && needed.rebounds == 0 && needed.assists == 0;

        Some(TripleDoubleProgress {
            player_id: line.player_id,
            name: line.name.clone(),
            team: line.team,
            current,
            needed,
            progress,
            is_triple_double,
        })
    }
}

/// The last `limit` occurred plays, oldest first.
pub fn recent_plays<'e>(occurred: &[&'e PlayEvent], limit: usize) -> Vec<&'e PlayEvent> {
    let start = occurred.len().saturating_sub(limit);
    occurred[start..].to_vec()
}

/// The `limit` highest scorers; equal points keep roster order.
pub fn top_scorers(lines: &[StatLine], limit: usize) -> Vec<StatLine> {
    let mut sorted: Vec<&StatLine> = lines.iter().collect();
    sorted.sort_by(|a, b| b.points.cmp(&a.points));
    sorted.into_iter().take(limit).cloned().collect()
}

/// Highest scorer on one side; ties go to the earlier roster entry.
fn leader_of(lines: &[StatLine], side: TeamSide) -> Option<&StatLine> {
    lines
        .iter()
        .filter(|l| l.team == side)
        .fold(None, |best: Option<&StatLine>, line| match best {
            Some(b) if b.points >= line.points => Some(b),
            _ => Some(line),
        })
}
