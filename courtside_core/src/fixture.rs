//! Game fixtures: the game, its roster, and the authored play script.
//!
//! The built-in fixture is the first quarter of the Apr 13 2025 Lakers at
//! Trail Blazers game. Other games can be loaded from JSON with the same
//! shape as the serialized [`GameFixture`]:
//!
//! ```json
//! {
//!   "game": { "game_id": "...", "league": "NBA", "day": "2025-04-13",
//!             "home": { "team_id": 1, "abbreviation": "POR", "name": "...", "nickname": "..." },
//!             "away": { ... } },
//!   "roster": [ { "player_id": 1, "full_name": "...", "team": "HOME" } ],
//!   "script": [ { "clock": "12:00", "description": "Q1 start" } ]
//! }
//! ```

use crate::error::FixtureError;
use crate::roster::{GameInfo, Roster, RosterEntry, TeamInfo, TeamSide};
use crate::script::{PlayEvent, ScriptCompiler, ScriptEntry};
use courtside_env::GameId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Game id of the built-in fixture.
pub const BUILTIN_GAME_ID: &str = "lakers_trailblazers_20250413";

/// Everything needed to build a projector for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFixture {
    pub game: GameInfo,
    pub roster: Vec<RosterEntry>,
    pub script: Vec<ScriptEntry>,
}

impl GameFixture {
    /// The built-in LAL @ POR first quarter.
    pub fn lal_at_por() -> Self {
        let game = GameInfo {
            game_id: GameId::new(BUILTIN_GAME_ID),
            league: "NBA".to_string(),
            day: "2025-04-13".to_string(),
            home: TeamInfo {
                team_id: 1610612757,
                abbreviation: "POR".to_string(),
                name: "Portland Trail Blazers".to_string(),
                nickname: "Trail Blazers".to_string(),
            },
            away: TeamInfo {
                team_id: 1610612747,
                abbreviation: "LAL".to_string(),
                name: "Los Angeles Lakers".to_string(),
                nickname: "Lakers".to_string(),
            },
        };

        let roster = ROSTER
            .iter()
            .map(|&(id, name, side)| RosterEntry::new(id, name, side))
            .collect();

        let script = SCRIPT.iter().copied().map(ScriptEntry::from).collect();

        Self {
            game,
            roster,
            script,
        }
    }

    /// Parses and validates a fixture from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let fixture: GameFixture = serde_json::from_str(json)?;
        fixture.validate()?;
        Ok(fixture)
    }

    /// Reads, parses, and validates a fixture file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let fixture = Self::from_json_str(&json)?;
        info!(
            "Loaded fixture {} from {} ({} players, {} plays)",
            fixture.game.game_id,
            path.display(),
            fixture.roster.len(),
            fixture.script.len()
        );
        Ok(fixture)
    }

    /// Serializes the fixture as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, FixtureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the roster and that at least one script entry compiles.
    pub fn validate(&self) -> Result<(), FixtureError> {
        if self.roster.is_empty() {
            return Err(FixtureError::EmptyRoster);
        }

        let mut seen = HashSet::with_capacity(self.roster.len());
        for entry in &self.roster {
            if !seen.insert(entry.player_id) {
                return Err(FixtureError::DuplicatePlayerId(entry.player_id));
            }
        }

        if self.compile().is_empty() {
            return Err(FixtureError::EmptyScript);
        }

        Ok(())
    }

    /// Builds the name-resolving roster.
    pub fn roster(&self) -> Roster {
        Roster::new(self.roster.clone())
    }

    /// Compiles the script against this fixture's game and roster.
    pub fn compile(&self) -> Vec<PlayEvent> {
        let roster = self.roster();
        ScriptCompiler::new(&self.game, &roster).compile(&self.script)
    }
}

impl Default for GameFixture {
    fn default() -> Self {
        Self::lal_at_por()
    }
}

const ROSTER: &[(u32, &str, TeamSide)] = &[
    (1, "Dalton Knecht", TeamSide::Away),
    (2, "Jordan Goodwin", TeamSide::Away),
    (3, "LeBron James", TeamSide::Away),
    (4, "Anthony Davis", TeamSide::Away),
    (5, "Austin Reaves", TeamSide::Away),
    (6, "Dalano Banton", TeamSide::Home),
    (7, "Donovan Clingan", TeamSide::Home),
    (8, "Scoot Henderson", TeamSide::Home),
    (9, "Jerami Grant", TeamSide::Home),
    (10, "Anfernee Simons", TeamSide::Home),
    (11, "Shake Milton", TeamSide::Away),
    (12, "Alex Len", TeamSide::Away),
    (13, "Toumani Camara", TeamSide::Home),
    (14, "Matisse Thybulle", TeamSide::Home),
    (15, "Kris Murray", TeamSide::Home),
];

const SCRIPT: &[(&str, &str)] = &[
    ("12:00", "Q1 start"),
    ("11:45", "Jump Ball Clingan vs. Len: Tip to Camara"),
    ("11:43", "MISS Thybulle 6' Driving Layup"),
    ("11:25", "Lakers Rebound"),
    ("11:23", "MISS Knecht 27' 3PT Jump Shot"),
    ("11:05", "Clingan REBOUND (Off:0 Def:1)"),
    ("10:40", "Camara 27' 3PT Pullup Jump Shot (3 PTS) (Clingan 1 AST)"),
    ("10:40", "James Bad Pass Turnover (P1.T1)"),
    ("10:34", "Banton STEAL (1 STL)"),
    ("10:13", "Banton 7' Running Layup (2 PTS)"),
    ("10:11", "MISS Milton 10' Driving Floating Jump Shot"),
    ("10:11", "Milton REBOUND (Off:1 Def:0)"),
    ("10:11", "MISS Milton 4' Tip Layup Shot"),
    ("10:10", "Murray BLOCK (1 BLK)"),
    ("10:02", "Camara REBOUND (Off:0 Def:1)"),
    ("09:48", "Thybulle Out of Bounds Lost Ball Turnover (P1.T1)"),
    ("09:38", "Knecht Traveling Turnover (P1.T2)"),
    ("09:38", "MISS Murray 6' Driving Layup"),
    ("09:36", "Knecht BLOCK (1 BLK)"),
    ("09:36", "Knecht REBOUND (Off:0 Def:1)"),
    ("09:25", "MISS James 13' Pullup Jump Shot"),
    ("09:23", "Banton REBOUND (Off:0 Def:1)"),
    ("09:16", "Clingan 2' Running Layup (2 PTS) (Banton 1 AST)"),
    ("08:58", "Knecht 25' 3PT Jump Shot (3 PTS) (Milton 1 AST)"),
    ("08:41", "MISS Camara 24' 3PT Jump Shot"),
    ("08:39", "Len REBOUND (Off:0 Def:1)"),
    ("08:30", "Goodwin Driving Dunk (2 PTS)"),
    ("08:12", "Thybulle Shooting Foul (P1.PN)"),
    ("08:12", "Milton Free Throw 1 of 2 (1 PTS)"),
    ("08:12", "MISS Milton Free Throw 2 of 2"),
    ("08:10", "Clingan REBOUND (Off:0 Def:2)"),
    ("07:55", "Banton 18' Pullup Jump Shot (4 PTS)"),
    ("07:37", "James Lost Ball Turnover (P2.T3)"),
    ("07:36", "Thybulle STEAL (1 STL)"),
    ("07:31", "Thybulle 3' Cutting Layup Shot (2 PTS) (Banton 2 AST)"),
    ("07:20", "Trail Blazers Timeout: Regular"),
    ("07:04", "MISS Davis 8' Hook Shot"),
    ("07:02", "Clingan REBOUND (Off:0 Def:3)"),
    ("06:47", "Murray 26' 3PT Jump Shot (3 PTS) (Clingan 2 AST)"),
    ("06:30", "Davis 5' Hook Shot (2 PTS) (James 1 AST)"),
    ("06:12", "Henderson Bad Pass Turnover (P1.T2)"),
    ("06:11", "Reaves STEAL (1 STL)"),
    ("06:05", "Reaves Alley Oop Dunk (2 PTS) (James 2 AST)"),
    ("05:48", "SUB: Henderson FOR Banton"),
    ("05:33", "Henderson 28' 3PT Step Back Jump Shot (3 PTS)"),
    ("05:15", "MISS Goodwin 3' Driving Layup"),
    ("05:15", "Clingan BLOCK (1 BLK)"),
    ("05:13", "Camara REBOUND (Off:0 Def:2)"),
    ("04:58", "Grant Putback Dunk (2 PTS)"),
    ("04:40", "Lakers Timeout: Regular"),
    ("04:22", "Knecht 6' Driving Floating Jump Shot (5 PTS)"),
    ("04:05", "Davis Shooting Foul (P1.PN)"),
    ("04:05", "Grant Free Throw 1 of 2 (3 PTS)"),
    ("04:05", "Grant Free Throw 2 of 2 (4 PTS)"),
    ("03:49", "MISS James 27' 3PT Jump Shot"),
    ("03:47", "Simons REBOUND (Off:0 Def:1)"),
    ("03:30", "Simons 25' 3PT Pullup Jump Shot (3 PTS) (Henderson 1 AST)"),
    ("03:12", "Knecht Traveling Turnover (P1.T4)"),
    ("02:58", "MISS Simons 14' Fadeaway Jump Shot"),
    ("02:56", "Davis BLOCK (1 BLK)"),
    ("02:55", "James REBOUND (Off:0 Def:1)"),
    ("02:40", "James 2' Driving Layup (2 PTS)"),
    ("02:22", "Henderson 11' Floating Jump Shot (5 PTS) (Grant 1 AST)"),
    ("02:05", "Goodwin 24' 3PT Jump Shot (5 PTS) (Knecht 1 AST)"),
    ("01:47", "Grant Offensive Foul Turnover (P2.T3)"),
    ("01:30", "MISS Reaves 19' Jump Shot"),
    ("01:28", "Murray REBOUND (Off:0 Def:1)"),
    ("01:10", "Banton 4' Driving Finger Roll Layup (6 PTS)"),
    ("00:52", "Camara Personal Take Foul (P1.PN)"),
    ("00:52", "Knecht Free Throw 1 of 2 (6 PTS)"),
    ("00:52", "Knecht Free Throw 2 of 2 (7 PTS)"),
    ("00:31", "Camara 5' Turnaround Hook Shot (5 PTS) (Simons 1 AST)"),
    ("00:12", "MISS Goodwin 30' 3PT Jump Shot"),
    ("00:10", "Clingan REBOUND (Off:0 Def:4)"),
    ("00:00", "End of 1st Quarter"),
];
