//! Tournament, TournamentDetails and TournamentStatus.

use crate::models::player::{Player, PlayerIndex};
use crate::models::round::Round;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Outcome code is not "1-0", "0-1" or "0.5-0.5".
    InvalidResult(String),
    /// No round with this number.
    RoundNotFound(u32),
    /// No match at this position in the round (1-based).
    MatchNotFound { round: u32, position: usize },
    /// The match already has a result; use an amendment to change it.
    ResultAlreadyRecorded { round: u32, position: usize },
    /// Enrolment is at `max_players`.
    TournamentFull { max_players: usize },
    PlayerAlreadyEnrolled(PlayerIndex),
    /// Player not enrolled here, or unknown to the registry.
    PlayerNotFound(PlayerIndex),
    /// Player cannot be withdrawn: they have been paired already.
    PlayerHasMatches(PlayerIndex),
    /// Pairing needs at least `required` enrolled players.
    NotEnoughPlayers { enrolled: usize, required: usize },
    /// All configured rounds exist already.
    MaxRoundsReached { round_count: u32 },
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Rejected tournament details (bad dates, zero capacity, ...).
    InvalidDetails(String),
    TournamentNotFound(usize),
    /// The directory holds its maximum number of tournaments.
    TooManyTournaments { max: usize },
    /// The in-memory change was applied but could not be written to disk.
    Storage(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidResult(code) => {
                write!(f, "Invalid result '{}': expected 1-0, 0-1 or 0.5-0.5", code)
            }
            TournamentError::RoundNotFound(n) => write!(f, "Round {} not found", n),
            TournamentError::MatchNotFound { round, position } => {
                write!(f, "Match {} not found in round {}", position, round)
            }
            TournamentError::ResultAlreadyRecorded { round, position } => {
                write!(f, "Match {} of round {} already has a result", position, round)
            }
            TournamentError::TournamentFull { max_players } => {
                write!(f, "Tournament is full ({} players)", max_players)
            }
            TournamentError::PlayerAlreadyEnrolled(i) => {
                write!(f, "Player {} is already enrolled", i)
            }
            TournamentError::PlayerNotFound(i) => write!(f, "Player {} not found", i),
            TournamentError::PlayerHasMatches(i) => {
                write!(f, "Player {} has already been paired and cannot be withdrawn", i)
            }
            TournamentError::NotEnoughPlayers { enrolled, required } => write!(
                f,
                "{} players enrolled, at least {} are required to create a round",
                enrolled, required
            ),
            TournamentError::MaxRoundsReached { round_count } => {
                write!(f, "All {} rounds have already been created", round_count)
            }
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::InvalidDetails(reason) => {
                write!(f, "Invalid tournament details: {}", reason)
            }
            TournamentError::TournamentNotFound(i) => write!(f, "Tournament {} not found", i),
            TournamentError::TooManyTournaments { max } => {
                write!(f, "Maximum number of tournaments reached ({})", max)
            }
            TournamentError::Storage(msg) => write!(f, "Could not save: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Lifecycle of a tournament. Transitions are explicit operator actions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Operator-supplied configuration of a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentDetails {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_players: usize,
    /// Number of rounds to play.
    pub round_count: u32,
    /// Free text, e.g. "blitz" or "rapid".
    pub format: String,
}

impl TournamentDetails {
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.name.trim().is_empty() {
            return Err(TournamentError::InvalidDetails("name is empty".into()));
        }
        if self.end_date < self.start_date {
            return Err(TournamentError::InvalidDetails(
                "end date is before start date".into(),
            ));
        }
        if self.max_players == 0 {
            return Err(TournamentError::InvalidDetails(
                "maximum number of players must be at least 1".into(),
            ));
        }
        if self.round_count == 0 {
            return Err(TournamentError::InvalidDetails(
                "number of rounds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Full tournament state: details, enrolled players with their running
/// scores, and the rounds played so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Tournament {
    /// Position in the directory; contiguous from 0.
    pub index: usize,
    pub details: TournamentDetails,
    pub status: TournamentStatus,
    /// Enrolled players in enrolment order. Owns every running score.
    pub(crate) players: Vec<Player>,
    pub(crate) rounds: Vec<Round>,
}

impl Tournament {
    /// Create a pending tournament with no players.
    pub fn new(index: usize, details: TournamentDetails) -> Self {
        Self {
            index,
            details,
            status: TournamentStatus::Pending,
            players: Vec::new(),
            rounds: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn get_player(&self, index: PlayerIndex) -> Option<&Player> {
        self.players.iter().find(|p| p.index == index)
    }

    /// Round by 1-based number.
    pub fn round(&self, number: u32) -> Result<&Round, TournamentError> {
        number
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i as usize))
            .ok_or(TournamentError::RoundNotFound(number))
    }

    pub(crate) fn round_mut(&mut self, number: u32) -> Result<&mut Round, TournamentError> {
        number
            .checked_sub(1)
            .and_then(|i| self.rounds.get_mut(i as usize))
            .ok_or(TournamentError::RoundNotFound(number))
    }

    /// Enrol a player. The tournament keeps its own copy, score reset to zero.
    pub fn add_player(&mut self, player: &Player) -> Result<(), TournamentError> {
        if self.get_player(player.index).is_some() {
            return Err(TournamentError::PlayerAlreadyEnrolled(player.index));
        }
        if self.players.len() >= self.details.max_players {
            return Err(TournamentError::TournamentFull {
                max_players: self.details.max_players,
            });
        }
        let mut enrolled = player.clone();
        enrolled.score = 0.0;
        self.players.push(enrolled);
        Ok(())
    }

    /// Withdraw a player who has not been paired in any round.
    pub fn withdraw_player(&mut self, index: PlayerIndex) -> Result<(), TournamentError> {
        let pos = self
            .players
            .iter()
            .position(|p| p.index == index)
            .ok_or(TournamentError::PlayerNotFound(index))?;
        if self
            .rounds
            .iter()
            .any(|r| r.involves(index) || r.bye == Some(index))
        {
            return Err(TournamentError::PlayerHasMatches(index));
        }
        self.players.remove(pos);
        Ok(())
    }

    /// Replace the details. Capacity and round count cannot drop below what
    /// already exists.
    pub fn update_details(&mut self, details: TournamentDetails) -> Result<(), TournamentError> {
        details.validate()?;
        if details.max_players < self.players.len() {
            return Err(TournamentError::InvalidDetails(format!(
                "{} players are already enrolled",
                self.players.len()
            )));
        }
        if (details.round_count as usize) < self.rounds.len() {
            return Err(TournamentError::InvalidDetails(format!(
                "{} rounds already exist",
                self.rounds.len()
            )));
        }
        self.details = details;
        Ok(())
    }

    /// Add `points` (possibly negative) to a player's running score. All score
    /// changes go through here.
    pub(crate) fn credit(&mut self, index: PlayerIndex, points: f64) -> Result<(), TournamentError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.index == index)
            .ok_or(TournamentError::PlayerNotFound(index))?;
        player.score += points;
        Ok(())
    }
}
