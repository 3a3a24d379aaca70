//! A single game between two players and its outcome.

use crate::models::player::PlayerIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of a finished game.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    WhiteWin,
    BlackWin,
    Draw,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::WhiteWin, Outcome::BlackWin, Outcome::Draw];

    /// The outcome code as typed by the operator: "1-0", "0-1" or "0.5-0.5".
    pub fn code(self) -> &'static str {
        match self {
            Outcome::WhiteWin => "1-0",
            Outcome::BlackWin => "0-1",
            Outcome::Draw => "0.5-0.5",
        }
    }

    /// Points earned by (white, black).
    pub fn points(self) -> (f64, f64) {
        match self {
            Outcome::WhiteWin => (1.0, 0.0),
            Outcome::BlackWin => (0.0, 1.0),
            Outcome::Draw => (0.5, 0.5),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is not one of the three outcome codes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidOutcome(pub String);

impl FromStr for Outcome {
    type Err = InvalidOutcome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Outcome::ALL
            .into_iter()
            .find(|o| o.code() == s)
            .ok_or_else(|| InvalidOutcome(s.to_string()))
    }
}

/// A pairing inside a round. Players are referenced by index; their scores
/// live on the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub white: PlayerIndex,
    pub black: PlayerIndex,
    /// None if not yet played.
    pub outcome: Option<Outcome>,
}

impl GameMatch {
    pub fn new(white: PlayerIndex, black: PlayerIndex) -> Self {
        Self {
            white,
            black,
            outcome: None,
        }
    }

    pub fn involves(&self, player: PlayerIndex) -> bool {
        self.white == player || self.black == player
    }

    pub fn is_played(&self) -> bool {
        self.outcome.is_some()
    }
}
