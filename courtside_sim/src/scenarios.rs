//! Replay scenarios for the projector.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// REPLAY-001: Tick through the whole period
    FullPeriod,

    /// REPLAY-002: Reset the timer halfway and play on
    ResetMidGame,

    /// REPLAY-003: Run far past the end of the period
    ClockExpiry,

    /// REPLAY-004: Seeded random clock jumps
    RandomJumps,

    /// REPLAY-005: Recent-plays window against the full feed
    RecentWindow,

    /// REPLAY-006: Reader threads racing timer resets
    ConcurrentReaders,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::FullPeriod,
            ScenarioId::ResetMidGame,
            ScenarioId::ClockExpiry,
            ScenarioId::RandomJumps,
            ScenarioId::RecentWindow,
            ScenarioId::ConcurrentReaders,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::FullPeriod => "full_period",
            ScenarioId::ResetMidGame => "reset_mid_game",
            ScenarioId::ClockExpiry => "clock_expiry",
            ScenarioId::RandomJumps => "random_jumps",
            ScenarioId::RecentWindow => "recent_window",
            ScenarioId::ConcurrentReaders => "concurrent_readers",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::FullPeriod => "Tick from 12:00 to 00:00, checking every snapshot",
            ScenarioId::ResetMidGame => "Reset at half time, expect a fresh period and the same final score",
            ScenarioId::ClockExpiry => "Jump hours past the buzzer, expect a frozen Final game",
            ScenarioId::RandomJumps => "Seeded random step sizes, repeated queries must agree",
            ScenarioId::RecentWindow => "Recent plays stay the tail of the play-by-play",
            ScenarioId::ConcurrentReaders => "Readers on threads while the timer is reset",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Scenarios serialize by name in JSON summaries
impl serde::Serialize for ScenarioId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full_period" | "fullperiod" | "replay-001" => Ok(ScenarioId::FullPeriod),
            "reset_mid_game" | "resetmidgame" | "replay-002" => Ok(ScenarioId::ResetMidGame),
            "clock_expiry" | "clockexpiry" | "replay-003" => Ok(ScenarioId::ClockExpiry),
            "random_jumps" | "randomjumps" | "replay-004" => Ok(ScenarioId::RandomJumps),
            "recent_window" | "recentwindow" | "replay-005" => Ok(ScenarioId::RecentWindow),
            "concurrent_readers" | "concurrentreaders" | "replay-006" => {
                Ok(ScenarioId::ConcurrentReaders)
            }
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
