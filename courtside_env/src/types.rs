//! Common types for the Courtside environment abstraction.

use serde::{Deserialize, Serialize};

/// Identifier of a simulated game.
///
/// Callers pass whatever id their routing layer received; the projector only
/// ever serves one game, so the id is informational.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    /// Creates a GameId from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_display() {
        let id = GameId::from("lakers_trailblazers_20250413");
        assert_eq!(id.to_string(), "lakers_trailblazers_20250413");
        assert_eq!(id.as_str(), "lakers_trailblazers_20250413");
    }

    #[test]
    fn test_game_id_equality_across_constructors() {
        let a = GameId::new(String::from("g1"));
        let b: GameId = "g1".into();
        assert_eq!(a, b);
    }
}
