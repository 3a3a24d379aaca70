//! Data structures for a chess tournament: players, matches, rounds, tournament state.

mod game;
mod player;
mod round;
mod tournament;

pub use game::{GameMatch, InvalidOutcome, Outcome};
pub use player::{Player, PlayerIndex, PlayerLookup, PlayerRegistry};
pub use round::{sort_standings, Round, RoundStatus, Standing};
pub use tournament::{Tournament, TournamentDetails, TournamentError, TournamentStatus};
