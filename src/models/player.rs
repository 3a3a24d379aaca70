//! Player record and the registry that hands players out to tournaments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identifier for a player, assigned by the registry at registration.
pub type PlayerIndex = u32;

/// A registered chess player.
///
/// Two players are the same entity when their `index` matches, whatever the
/// other fields say.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub index: PlayerIndex,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "prenom")]
    pub given_name: String,
    #[serde(rename = "date_naissance")]
    pub birthdate: NaiveDate,
    #[serde(rename = "elo")]
    pub rating: i32,
    /// Running tournament score. Only `Tournament::credit` and the replay in
    /// `recompute_scores` change it.
    #[serde(default)]
    pub(crate) score: f64,
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Player {}

impl Player {
    /// Create a player with a zero score.
    pub fn new(
        index: PlayerIndex,
        name: impl Into<String>,
        given_name: impl Into<String>,
        birthdate: NaiveDate,
        rating: i32,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            given_name: given_name.into(),
            birthdate,
            rating,
            score: 0.0,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// "Name GivenName", the form used in match labels.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.given_name)
    }
}

/// Read access to registered players, by index.
pub trait PlayerLookup {
    fn lookup_by_index(&self, index: PlayerIndex) -> Option<&Player>;
}

/// All registered players, in registration order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_players(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Register a new player and return its index. Indices start at 1 and are
    /// never reused. Field validation is the caller's business.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        given_name: impl Into<String>,
        birthdate: NaiveDate,
        rating: i32,
    ) -> PlayerIndex {
        let index = self.players.iter().map(|p| p.index).max().unwrap_or(0) + 1;
        self.players
            .push(Player::new(index, name, given_name, birthdate, rating));
        index
    }
}

impl PlayerLookup for PlayerRegistry {
    fn lookup_by_index(&self, index: PlayerIndex) -> Option<&Player> {
        self.players.iter().find(|p| p.index == index)
    }
}
