//! Chess tournament manager: library with models, round/scoring logic and JSON storage.

pub mod directory;
pub mod logic;
pub mod models;
pub mod store;

pub use directory::{TournamentDirectory, MAX_TOURNAMENTS};
pub use logic::{
    amend_result, create_round, delete_round, finish_tournament, recompute_scores, record_result,
    standings, start_tournament, Pairings, PairingStrategy, RandomPairing, MIN_PLAYERS_FOR_ROUND,
};
pub use models::{
    GameMatch, Outcome, Player, PlayerIndex, PlayerLookup, PlayerRegistry, Round, RoundStatus,
    Standing, Tournament, TournamentDetails, TournamentError, TournamentStatus,
};
pub use store::{JsonStore, StoreError, TournamentRecord, TournamentStore};
