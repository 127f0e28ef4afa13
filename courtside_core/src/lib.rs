//! Courtside Core - Mock Live-Game Projector
//!
//! Replays a pre-authored play script against the wall clock so a basketball
//! game looks live without any upstream feed:
//! 1. **Compile**: `MM:SS` clock labels and free-text plays become typed events
//!    with an inferred team and point value
//! 2. **Project**: an anchor timestamp and "now" give the remaining game time
//! 3. **Compose**: plays at or before that time feed the scoreboard, box score,
//!    play-by-play, and the commentary views built on them
//!
//! The only mutable state is the anchor, moved by a timer reset.

pub mod clock;
pub mod error;
pub mod feed;
pub mod fixture;
pub mod occurrence;
pub mod projector;
pub mod roster;
pub mod script;
pub mod stats;
pub mod timer;
pub mod validation;

// Re-export key types for convenience
pub use clock::{ClockProjector, GameClockState};
pub use error::{FixtureError, ScriptError};
pub use feed::{FeedComposer, Leaders, PlayByPlayEntry, Scoreboard, TripleDoubleProgress};
pub use fixture::GameFixture;
pub use occurrence::EventFilter;
pub use projector::{
    BoxScore, GameContext, GameDetails, GameListing, GameSnapshot, GameStatus, GameSummary,
    MockGameProjector, ProjectorConfig, TimerReset,
};
pub use roster::{GameInfo, Roster, RosterEntry, TeamInfo, TeamSide};
pub use script::{PlayCategory, PlayEvent, ScriptCompiler, ScriptEntry};
pub use stats::{StatAggregator, StatLine};
pub use timer::TimerControl;
pub use validation::{ValidationReport, ValidationSession, Violation};
