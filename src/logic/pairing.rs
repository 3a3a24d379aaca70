//! Pairing: split the enrolled players into white/black pairs for a new round.

use crate::models::{Player, PlayerIndex, Round};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Pairs for one round, plus the player left over when the field is odd.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pairings {
    /// (white, black)
    pub pairs: Vec<(PlayerIndex, PlayerIndex)>,
    pub bye: Option<PlayerIndex>,
}

/// Decides who plays whom in the next round.
///
/// Implementations must cover every player exactly once: in one pair, or as
/// the single bye when the count is odd.
pub trait PairingStrategy {
    fn pair(&mut self, players: &[Player], history: &[Round]) -> Pairings;
}

/// Uniformly random pairing.
///
/// Ignores scores and previous opponents, so rematches across rounds are
/// possible.
pub struct RandomPairing {
    rng: StdRng,
}

impl RandomPairing {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible pairings, for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPairing {
    fn default() -> Self {
        Self::new()
    }
}

impl PairingStrategy for RandomPairing {
    fn pair(&mut self, players: &[Player], _history: &[Round]) -> Pairings {
        let mut order: Vec<PlayerIndex> = players.iter().map(|p| p.index).collect();
        order.shuffle(&mut self.rng);

        let chunks = order.chunks_exact(2);
        let bye = chunks.remainder().first().copied();
        let pairs = chunks.map(|c| (c[0], c[1])).collect();

        Pairings { pairs, bye }
    }
}
