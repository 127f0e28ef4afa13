//! Teams, players, and name resolution.
//!
//! Play descriptions mention players by surname ("Clingan REBOUND") and now
//! and then by full name. The roster owns the fixed player-to-team mapping
//! and answers two questions for the rest of the crate:
//!
//! - **Who is this?** [`Roster::resolve`]: exact full name first, then
//!   surname, otherwise nobody.
//! - **Who is mentioned first?** [`Roster::first_mentioned`]: used by team
//!   inference when a description carries no team token.

use courtside_env::GameId;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Which side of the scoreboard a team or player belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    /// Both sides, home first.
    pub const BOTH: [TeamSide; 2] = [TeamSide::Home, TeamSide::Away];
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::Home => write!(f, "HOME"),
            TeamSide::Away => write!(f, "AWAY"),
        }
    }
}

/// Static description of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    /// Numeric id used by the upstream stats provider
    pub team_id: u32,

    /// Three-letter code, e.g. "POR"
    pub abbreviation: String,

    /// Full name, e.g. "Portland Trail Blazers"
    pub name: String,

    /// Short name used in play text, e.g. "Trail Blazers"
    pub nickname: String,
}

impl TeamInfo {
    /// Tokens that identify this team inside a play description,
    /// most specific first.
    pub fn tokens(&self) -> [&str; 3] {
        [&self.name, &self.nickname, &self.abbreviation]
    }
}

/// The single simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub game_id: GameId,
    pub league: String,
    /// Calendar day of the game, `YYYY-MM-DD`
    pub day: String,
    pub home: TeamInfo,
    pub away: TeamInfo,
}

impl GameInfo {
    /// Returns the team playing on `side`.
    pub fn team(&self, side: TeamSide) -> &TeamInfo {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }
}

/// One player of the fixed roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: u32,
    pub full_name: String,
    pub team: TeamSide,
}

impl RosterEntry {
    /// Creates a roster entry.
    pub fn new(player_id: u32, full_name: &str, team: TeamSide) -> Self {
        Self {
            player_id,
            full_name: full_name.to_string(),
            team,
        }
    }

    /// Last whitespace-separated token of the full name.
    pub fn surname(&self) -> &str {
        last_token(&self.full_name)
    }
}

/// Compiled search patterns for one roster entry.
#[derive(Debug, Clone)]
struct NamePatterns {
    full_name: Option<Regex>,
    surname: Option<Regex>,
}

/// The fixed player-to-team mapping.
///
/// Iteration order is authoring order and is significant: it breaks ties in
/// name resolution, team inference, and leader selection.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    patterns: Vec<NamePatterns>,
}

impl Roster {
    /// Builds a roster, compiling whole-word patterns for every name.
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        let patterns = entries
            .iter()
            .map(|entry| NamePatterns {
                full_name: word_pattern(&entry.full_name),
                surname: word_pattern(entry.surname()),
            })
            .collect();

        Self { entries, patterns }
    }

    /// Returns all entries in roster order.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Iterates entries in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter()
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the roster has no players.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a player by id.
    pub fn get(&self, player_id: u32) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.player_id == player_id)
    }

    /// Resolves a name extracted from play text to a roster entry.
    ///
    /// 1. exact, case-insensitive full-name match
    /// 2. the candidate's last token against each player's surname
    /// 3. otherwise `None`
    ///
    /// Collisions go to the first entry in roster order.
    pub fn resolve(&self, name: &str) -> Option<&RosterEntry> {
        let candidate = name.trim();
        if candidate.is_empty() {
            return None;
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.full_name.eq_ignore_ascii_case(candidate))
        {
            return Some(entry);
        }

        let surname = last_token(candidate);
        self.entries
            .iter()
            .find(|e| e.surname().eq_ignore_ascii_case(surname))
    }

    /// Finds the player whose name appears earliest in `text`.
    ///
    /// Both the full name and the surname are searched as whole words.
    /// Equal positions keep the entry that comes first in the roster.
    pub fn first_mentioned(&self, text: &str) -> Option<&RosterEntry> {
        let mut best: Option<(usize, &RosterEntry)> = None;

        for (entry, patterns) in self.entries.iter().zip(&self.patterns) {
            let position = [&patterns.full_name, &patterns.surname]
                .into_iter()
                .flatten()
                .filter_map(|re| find_word(re, text))
                .min();

            if let Some(pos) = position {
                match best {
                    Some((best_pos, _)) if best_pos <= pos => {}
                    _ => best = Some((pos, entry)),
                }
            }
        }

        best.map(|(_, entry)| entry)
    }
}

/// Compiles a case-sensitive whole-word pattern for a literal token.
///
/// Boundaries are "not a letter or digit" rather than `\b` so tokens that
/// end in punctuation ("Jr.") still match.
pub(crate) fn word_pattern(token: &str) -> Option<Regex> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Regex::new(&format!(
        r"(?:^|[^\p{{L}}\p{{N}}])(?P<word>{})(?:[^\p{{L}}\p{{N}}]|$)",
        regex::escape(token)
    ))
    .ok()
}

/// Byte offset of the first whole-word match of `re` in `text`.
pub(crate) fn find_word(re: &Regex, text: &str) -> Option<usize> {
    re.captures(text)
        .and_then(|caps| caps.name("word"))
        .map(|m| m.start())
}

fn last_token(name: &str) -> &str {
    name.split_whitespace().last().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(vec![
            RosterEntry::new(1, "Dalton Knecht", TeamSide::Away),
            RosterEntry::new(3, "LeBron James", TeamSide::Away),
            RosterEntry::new(7, "Donovan Clingan", TeamSide::Home),
            RosterEntry::new(12, "Alex Len", TeamSide::Away),
            RosterEntry::new(13, "Toumani Camara", TeamSide::Home),
        ])
    }

    #[test]
    fn test_resolve_full_name_case_insensitive() {
        let roster = roster();
        let entry = roster.resolve("lebron JAMES").unwrap();
        assert_eq!(entry.player_id, 3);
    }

    #[test]
    fn test_resolve_surname_fallback() {
        let roster = roster();
        assert_eq!(roster.resolve("Clingan").unwrap().player_id, 7);
        // Unknown first name, known surname
        assert_eq!(roster.resolve("Bronny James").unwrap().player_id, 3);
    }

    #[test]
    fn test_resolve_unknown_name() {
        let roster = roster();
        assert!(roster.resolve("Thybulle").is_none());
        assert!(roster.resolve("   ").is_none());
    }

    #[test]
    fn test_resolve_collision_takes_first_in_roster_order() {
        let roster = Roster::new(vec![
            RosterEntry::new(20, "Jalen Williams", TeamSide::Home),
            RosterEntry::new(21, "Jaylin Williams", TeamSide::Away),
        ]);
        assert_eq!(roster.resolve("Williams").unwrap().player_id, 20);
    }

    #[test]
    fn test_first_mentioned_prefers_earliest_position() {
        let roster = roster();
        // Len (roster index 3) appears after Clingan (index 2)
        let entry = roster
            .first_mentioned("Jump Ball Clingan vs. Len: Tip to Camara")
            .unwrap();
        assert_eq!(entry.player_id, 7);

        // Camara comes later in the roster but earlier in the text
        let entry = roster
            .first_mentioned("Camara 27' 3PT Pullup Jump Shot (3 PTS) (Clingan 1 AST)")
            .unwrap();
        assert_eq!(entry.player_id, 13);
    }

    #[test]
    fn test_first_mentioned_requires_whole_words() {
        let roster = roster();
        assert!(roster.first_mentioned("Lens flare timeout").is_none());
        assert!(roster.first_mentioned("Q1 start").is_none());
    }

    #[test]
    fn test_team_tokens_most_specific_first() {
        let team = TeamInfo {
            team_id: 1610612757,
            abbreviation: "POR".into(),
            name: "Portland Trail Blazers".into(),
            nickname: "Trail Blazers".into(),
        };
        assert_eq!(team.tokens(), ["Portland Trail Blazers", "Trail Blazers", "POR"]);
    }
}
