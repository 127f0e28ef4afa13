//! Per-player stat attribution from free-text play descriptions.
//!
//! The aggregator replays every occurred play and credits whoever the text
//! names. It is a heuristic over a closed, pre-authored vocabulary, applied
//! in a fixed priority order:
//!
//! - **Scoring** (`points > 0`): shooter from `<Name> <dist>' <shot>`, then
//!   `<Name> <shot>`, then `<Name> Free Throw`, then a leading name before
//!   `(N PTS)`. A trailing `(<Name> N AST)` credits one assist.
//! - **Other categories** (at most one per play, case-sensitive):
//!   `REBOUND`, `STEAL`, `BLOCK (`, `Turnover`.
//!
//! Names that do not resolve against the roster are skipped. Aggregation
//! always starts from zeroed lines for the whole roster, so the result for a
//! given occurred set never depends on earlier queries.

use crate::roster::{Roster, RosterEntry, TeamSide};
use crate::script::PlayEvent;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Capitalised name words, lazily matched so trailing play words are left alone.
const NAME: &str = r"(?P<name>[A-Z][A-Za-z.'\-]*(?:\s+[A-Z][A-Za-z.'\-]*)*?)";

/// Turnover types that sit between the player name and "Turnover".
const TURNOVER_TYPES: &str = "Bad Pass|Lost Ball|Out of Bounds Lost Ball|Out of Bounds - Bad Pass|\
Traveling|Offensive Foul|Shot Clock|Step Out of Bounds|Discontinued Dribble|3 Second Violation|\
Palming|Double Dribble|Kicked Ball|Backcourt|Offensive Goaltending|Lane Violation";

static SCORER_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Knecht 25' 3PT Jump Shot (3 PTS)
        format!(r"^{}\s+\d+'\s", NAME),
        // Goodwin Driving Dunk (2 PTS)
        format!(r"^{}\s+(?:[A-Z][a-z]+\s+)*?(?:Dunk|Layup|Jump Shot|Hook Shot|3PT)", NAME),
        // Grant Free Throw 1 of 2 (3 PTS)
        format!(r"^{}\s+Free Throw", NAME),
        // anything else carrying a points tally
        format!(r"^{}\s.*\(\d+ PTS\)", NAME),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static ASSIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\({}\s+\d+\s+AST\)", NAME)).unwrap());

static REBOUND_ACTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<name>.+?)\s+REBOUND").unwrap());
static STEAL_ACTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<name>.+?)\s+STEAL").unwrap());
static BLOCK_ACTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<name>.+?)\s+BLOCK \(").unwrap());
static TURNOVER_ACTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?P<name>.+?)\s+(?:(?:{})\s+)?Turnover", TURNOVER_TYPES)).unwrap()
});

/// A player's aggregated line as of one remaining-time value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub player_id: u32,
    pub name: String,
    pub team: TeamSide,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
}

impl StatLine {
    /// An all-zero line for a roster entry.
    pub fn zero(entry: &RosterEntry) -> Self {
        Self {
            player_id: entry.player_id,
            name: entry.full_name.clone(),
            team: entry.team,
            points: 0,
            rebounds: 0,
            assists: 0,
            steals: 0,
            blocks: 0,
            turnovers: 0,
        }
    }

    /// Counting stats in a fixed order: pts, reb, ast, stl, blk, tov.
    pub fn counts(&self) -> [u32; 6] {
        [
            self.points,
            self.rebounds,
            self.assists,
            self.steals,
            self.blocks,
            self.turnovers,
        ]
    }

    fn credit(&mut self, category: StatCategory) {
        match category {
            StatCategory::Rebound => self.rebounds += 1,
            StatCategory::Steal => self.steals += 1,
            StatCategory::Block => self.blocks += 1,
            StatCategory::Turnover => self.turnovers += 1,
        }
    }
}

/// Non-scoring stat categories, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    Rebound,
    Steal,
    Block,
    Turnover,
}

impl StatCategory {
    /// Detection order; the first marker found wins.
    pub const PRIORITY: [StatCategory; 4] = [
        StatCategory::Rebound,
        StatCategory::Steal,
        StatCategory::Block,
        StatCategory::Turnover,
    ];

    /// Case-sensitive substring that flags this category.
    pub fn marker(&self) -> &'static str {
        match self {
            StatCategory::Rebound => "REBOUND",
            StatCategory::Steal => "STEAL",
            StatCategory::Block => "BLOCK (",
            StatCategory::Turnover => "Turnover",
        }
    }

    fn actor_pattern(&self) -> &'static Regex {
        match self {
            StatCategory::Rebound => &REBOUND_ACTOR,
            StatCategory::Steal => &STEAL_ACTOR,
            StatCategory::Block => &BLOCK_ACTOR,
            StatCategory::Turnover => &TURNOVER_ACTOR,
        }
    }

    /// The single category a description contributes to, if any.
    pub fn detect(description: &str) -> Option<StatCategory> {
        Self::PRIORITY
            .into_iter()
            .find(|category| description.contains(category.marker()))
    }
}

/// Extracts the shooter's name from a made-shot description.
pub fn extract_scorer(description: &str) -> Option<&str> {
    SCORER_RULES
        .iter()
        .find_map(|rule| rule.captures(description))
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str())
}

/// Extracts the assisting player's name from a `(<Name> N AST)` suffix.
pub fn extract_assist(description: &str) -> Option<&str> {
    ASSIST
        .captures(description)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str())
}

/// Extracts the acting player for a non-scoring category.
pub fn extract_actor(category: StatCategory, description: &str) -> Option<&str> {
    category
        .actor_pattern()
        .captures(description)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str().trim())
}

/// Replays occurred plays into per-player stat lines.
pub struct StatAggregator<'a> {
    roster: &'a Roster,
}

impl<'a> StatAggregator<'a> {
    /// Creates an aggregator over a roster.
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// Aggregates the given occurred plays.
    ///
    /// Returns one line per roster entry, in roster order.
    pub fn aggregate<'e, I>(&self, occurred: I) -> Vec<StatLine>
    where
        I: IntoIterator<Item = &'e PlayEvent>,
    {
        let mut lines: Vec<StatLine> = self.roster.iter().map(StatLine::zero).collect();

        let mut index: HashMap<u32, usize> = HashMap::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            index.entry(line.player_id).or_insert(i);
        }

        for event in occurred {
            self.apply(event, &mut lines, &index);
        }

        lines
    }

    fn apply(&self, event: &PlayEvent, lines: &mut [StatLine], index: &HashMap<u32, usize>) {
        let description = event.description.as_str();

        if event.points > 0 {
            match self.scorer_line(description, lines, index) {
                Some(line) => line.points += u32::from(event.points),
                None => debug!(
                    "No scorer attributed for play {}: {:?}",
                    event.sequence_id, description
                ),
            }

            if let Some(name) = extract_assist(description) {
                match self.line_for(Some(name), lines, index) {
                    Some(line) => line.assists += 1,
                    None => debug!("Unresolved assist {:?} on play {}", name, event.sequence_id),
                }
            }
        }

        if let Some(category) = StatCategory::detect(description) {
            match self.line_for(extract_actor(category, description), lines, index) {
                Some(line) => line.credit(category),
                None => debug!(
                    "No {:?} attributed for play {}: {:?}",
                    category, event.sequence_id, description
                ),
            }
        }
    }

    /// The scorer's line, trying the longest run of capitalised words first.
    ///
    /// `extract_scorer` can stop short on shots with no distance
    /// ("LeBron James Driving Dunk" yields "LeBron"), so every prefix of the
    /// leading capitalised run down to the extracted name is tried.
    fn scorer_line<'l>(
        &self,
        description: &str,
        lines: &'l mut [StatLine],
        index: &HashMap<u32, usize>,
    ) -> Option<&'l mut StatLine> {
        let shortest = extract_scorer(description)?.split_whitespace().count();
        let run: Vec<&str> = description
            .split_whitespace()
            .take_while(|word| word.starts_with(|c: char| c.is_ascii_uppercase()))
            .collect();

        let entry = (shortest..=run.len())
            .rev()
            .find_map(|n| self.roster.resolve(&run[..n].join(" ")))?;
        let i = *index.get(&entry.player_id)?;
        lines.get_mut(i)
    }

    fn line_for<'l>(
        &self,
        name: Option<&str>,
        lines: &'l mut [StatLine],
        index: &HashMap<u32, usize>,
    ) -> Option<&'l mut StatLine> {
        let entry = self.roster.resolve(name?)?;
        let i = *index.get(&entry.player_id)?;
        lines.get_mut(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::GameFixture;
    use crate::occurrence::EventFilter;

    fn line<'l>(lines: &'l [StatLine], name: &str) -> &'l StatLine {
        lines.iter().find(|l| l.name == name).unwrap()
    }

    #[test]
    fn test_extract_scorer_rules() {
        assert_eq!(
            extract_scorer("Camara 27' 3PT Pullup Jump Shot (3 PTS) (Clingan 1 AST)"),
            Some("Camara")
        );
        assert_eq!(extract_scorer("LeBron James 2' Driving Layup (2 PTS)"), Some("LeBron James"));
        assert_eq!(extract_scorer("Goodwin Driving Dunk (2 PTS)"), Some("Goodwin"));
        // Lazy names stop at the first word; the aggregator widens them
        assert_eq!(extract_scorer("LeBron James Driving Dunk (2 PTS)"), Some("LeBron"));
        assert_eq!(extract_scorer("Reaves Alley Oop Dunk (2 PTS) (James 2 AST)"), Some("Reaves"));
        assert_eq!(extract_scorer("Grant Free Throw 1 of 2 (3 PTS)"), Some("Grant"));
        assert_eq!(extract_scorer("Banton Tip Shot (8 PTS)"), Some("Banton"));
        assert_eq!(extract_scorer("Q1 start"), None);
    }

    #[test]
    fn test_extract_assist() {
        assert_eq!(
            extract_assist("Clingan 2' Running Layup (2 PTS) (Banton 1 AST)"),
            Some("Banton")
        );
        assert_eq!(extract_assist("Banton 7' Running Layup (2 PTS)"), None);
    }

    #[test]
    fn test_detect_category_priority() {
        assert_eq!(StatCategory::detect("Clingan REBOUND (Off:0 Def:1)"), Some(StatCategory::Rebound));
        assert_eq!(StatCategory::detect("Banton STEAL (1 STL)"), Some(StatCategory::Steal));
        assert_eq!(StatCategory::detect("Murray BLOCK (1 BLK)"), Some(StatCategory::Block));
        assert_eq!(StatCategory::detect("Knecht Traveling Turnover (P1.T2)"), Some(StatCategory::Turnover));
        // Team rebounds are not uppercase and credit nobody
        assert_eq!(StatCategory::detect("Lakers Rebound"), None);
        // Only the parenthetical block form counts
        assert_eq!(StatCategory::detect("Shot BLOCKED at the rim"), None);
    }

    #[test]
    fn test_extract_actor_peels_turnover_type() {
        assert_eq!(
            extract_actor(StatCategory::Turnover, "James Bad Pass Turnover (P1.T1)"),
            Some("James")
        );
        assert_eq!(
            extract_actor(StatCategory::Turnover, "Thybulle Out of Bounds Lost Ball Turnover (P1.T1)"),
            Some("Thybulle")
        );
        assert_eq!(
            extract_actor(StatCategory::Rebound, "Clingan REBOUND (Off:0 Def:1)"),
            Some("Clingan")
        );
    }

    #[test]
    fn test_aggregate_nothing_occurred_is_all_zero() {
        let fixture = GameFixture::lal_at_por();
        let roster = fixture.roster();
        let lines = StatAggregator::new(&roster).aggregate(std::iter::empty());

        assert_eq!(lines.len(), roster.len());
        assert!(lines.iter().all(|l| l.counts() == [0; 6]));
    }

    #[test]
    fn test_aggregate_full_quarter() {
        let fixture = GameFixture::lal_at_por();
        let roster = fixture.roster();
        let script = fixture.compile();
        let occurred = EventFilter::occurred(&script, 0);

        let lines = StatAggregator::new(&roster).aggregate(occurred);

        assert_eq!(line(&lines, "Dalton Knecht").counts(), [7, 1, 1, 0, 1, 2]);
        assert_eq!(line(&lines, "LeBron James").counts(), [2, 1, 2, 0, 0, 2]);
        assert_eq!(line(&lines, "Dalano Banton").counts(), [6, 1, 2, 1, 0, 0]);
        assert_eq!(line(&lines, "Donovan Clingan").counts(), [2, 4, 2, 0, 1, 0]);
        assert_eq!(line(&lines, "Toumani Camara").counts(), [5, 2, 0, 0, 0, 0]);
        assert_eq!(line(&lines, "Matisse Thybulle").counts(), [2, 0, 0, 1, 0, 1]);
        assert_eq!(line(&lines, "Shake Milton").counts(), [1, 1, 1, 0, 0, 0]);

        let home: u32 = lines.iter().filter(|l| l.team == TeamSide::Home).map(|l| l.points).sum();
        let away: u32 = lines.iter().filter(|l| l.team == TeamSide::Away).map(|l| l.points).sum();
        assert_eq!((home, away), (30, 19));
    }

    #[test]
    fn test_aggregate_mid_quarter() {
        let fixture = GameFixture::lal_at_por();
        let roster = fixture.roster();
        let script = fixture.compile();

        // 06:00 left
        let lines = StatAggregator::new(&roster).aggregate(EventFilter::occurred(&script, 360));

        assert_eq!(line(&lines, "Dalton Knecht").counts(), [3, 1, 0, 0, 1, 1]);
        assert_eq!(line(&lines, "LeBron James").counts(), [0, 0, 2, 0, 0, 2]);
        assert_eq!(line(&lines, "Donovan Clingan").counts(), [2, 3, 2, 0, 0, 0]);
        assert_eq!(line(&lines, "Scoot Henderson").counts(), [0, 0, 0, 0, 0, 1]);
        assert_eq!(line(&lines, "Kris Murray").counts(), [3, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_scorer_full_name_without_distance() {
        let fixture = GameFixture::lal_at_por();
        let roster = fixture.roster();
        let compiler = crate::script::ScriptCompiler::new(&fixture.game, &roster);
        let script = compiler.compile(&[
            ("06:05", "LeBron James Driving Dunk (2 PTS)").into(),
            ("05:40", "Anthony Davis Turnaround Hook Shot (2 PTS) (Austin Reaves 1 AST)").into(),
            ("05:10", "Grant Putback Dunk (2 PTS)").into(),
        ]);

        let lines = StatAggregator::new(&roster).aggregate(&script);

        assert_eq!(line(&lines, "LeBron James").points, 2);
        assert_eq!(line(&lines, "Anthony Davis").points, 2);
        assert_eq!(line(&lines, "Austin Reaves").assists, 1);
        assert_eq!(line(&lines, "Jerami Grant").points, 2);
    }

    #[test]
    fn test_aggregate_skips_unresolved_names() {
        let fixture = GameFixture::lal_at_por();
        let roster = fixture.roster();
        let compiler = crate::script::ScriptCompiler::new(&fixture.game, &roster);
        let script = compiler.compile(&[
            ("10:00", "Wembanyama 3' Driving Dunk (2 PTS) (Paul 1 AST)").into(),
            ("09:50", "Clingan REBOUND (Off:0 Def:1)").into(),
        ]);

        let lines = StatAggregator::new(&roster).aggregate(&script);

        // The dunk counts for the team but nobody on the roster gets it
        assert_eq!(script[0].points, 2);
        assert!(lines.iter().all(|l| l.points == 0 && l.assists == 0));
        assert_eq!(line(&lines, "Donovan Clingan").rebounds, 1);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let fixture = GameFixture::lal_at_por();
        let roster = fixture.roster();
        let script = fixture.compile();
        let aggregator = StatAggregator::new(&roster);

        for remaining in [720, 640, 451, 245, 0] {
            let first = aggregator.aggregate(EventFilter::occurred(&script, remaining));
            let second = aggregator.aggregate(EventFilter::occurred(&script, remaining));
            assert_eq!(first, second);
        }
    }
}
