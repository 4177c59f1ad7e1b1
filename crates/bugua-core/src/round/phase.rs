use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a reading round.
///
/// Phases advance linearly; the only backward edge is an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Deck is being randomized; no input accepted.
    Shuffling,
    /// Player is filling the five slots.
    Picking,
    /// Board is complete; waiting for category and gender.
    CategorySelect,
    /// The oracle sequence is running; no input accepted.
    Analyzing,
    /// Terminal phase: reading shown, chat available.
    Result,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Shuffling => "SHUFFLING",
            GamePhase::Picking => "PICKING",
            GamePhase::CategorySelect => "CATEGORY_SELECT",
            GamePhase::Analyzing => "ANALYZING",
            GamePhase::Result => "RESULT",
        };
        f.write_str(name)
    }
}

/// How pieces reach the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Draw face-down pieces from a shuffled deck; slots fill in fixed order.
    #[default]
    Flip,
    /// Choose piece types directly for any slot, in any order.
    Manual,
}

impl std::str::FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flip" => Ok(InputMode::Flip),
            "manual" => Ok(InputMode::Manual),
            other => Err(format!("Unknown input mode: {}", other)),
        }
    }
}
