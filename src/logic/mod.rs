//! Tournament business logic: lifecycle, pairing, rounds and standings.

mod lifecycle;
mod pairing;
mod rounds;
mod standings;

pub use lifecycle::{finish_tournament, start_tournament};
pub use pairing::{Pairings, PairingStrategy, RandomPairing};
pub use rounds::{amend_result, create_round, delete_round, record_result, MIN_PLAYERS_FOR_ROUND};
pub use standings::{recompute_scores, standings};
