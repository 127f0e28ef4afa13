//! Error types for the Courtside projector.
//!
//! Query paths never fail; these cover the edges around them: a script line
//! that cannot be compiled, and a fixture file that cannot be loaded.

use thiserror::Error;

/// Errors raised while compiling a single script entry.
///
/// The compiler turns these into a dropped entry plus a warning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// Clock label is not `MM:SS`
    #[error("Malformed clock label: {0:?}")]
    MalformedClock(String),
}

/// Errors raised while loading a game fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Fixture file could not be read
    #[error("Fixture I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fixture JSON did not match the expected shape
    #[error("Fixture parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No players to attribute stats to
    #[error("Fixture roster is empty")]
    EmptyRoster,

    /// Two roster entries share a player id
    #[error("Duplicate player id in roster: {0}")]
    DuplicatePlayerId(u32),

    /// No script entries survived compilation
    #[error("Fixture script has no playable entries")]
    EmptyScript,
}

impl ScriptError {
    /// Creates a malformed-clock error.
    pub fn malformed(label: impl Into<String>) -> Self {
        Self::MalformedClock(label.into())
    }
}
