//! Round: one pairing cycle of a tournament.

use crate::models::game::GameMatch;
use crate::models::player::PlayerIndex;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Progress of a round.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Paired; some matches still have no result.
    #[default]
    InProgress,
    /// Every match has a result and the snapshot is up to date.
    Completed,
}

/// A player's points in a standings table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerIndex,
    pub points: f64,
}

/// Sort standings by points, highest first. Equal points keep their input order.
pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| b.points.total_cmp(&a.points));
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based position in the tournament.
    pub number: u32,
    pub created_at: NaiveDateTime,
    pub status: RoundStatus,
    pub matches: Vec<GameMatch>,
    /// Player left unpaired in an odd-sized field.
    pub bye: Option<PlayerIndex>,
    /// Round-local standings, filled in when the round completes.
    pub standings: Vec<Standing>,
}

impl Round {
    pub fn new(number: u32, created_at: NaiveDateTime, matches: Vec<GameMatch>) -> Self {
        Self {
            number,
            created_at,
            status: RoundStatus::InProgress,
            matches,
            bye: None,
            standings: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == RoundStatus::Completed
    }

    /// True once every match carries an outcome.
    pub fn all_results_in(&self) -> bool {
        self.matches.iter().all(GameMatch::is_played)
    }

    pub fn involves(&self, player: PlayerIndex) -> bool {
        self.matches.iter().any(|m| m.involves(player))
    }

    /// Mark the round completed and take its standings snapshot.
    pub fn complete(&mut self) {
        self.status = RoundStatus::Completed;
        self.standings = self.local_standings();
    }

    /// Standings from this round's matches only: each player who played,
    /// in order of first appearance, sorted by points.
    pub fn local_standings(&self) -> Vec<Standing> {
        let mut table: Vec<Standing> = Vec::with_capacity(self.matches.len() * 2);
        for m in &self.matches {
            for player in [m.white, m.black] {
                if !table.iter().any(|s| s.player == player) {
                    table.push(Standing {
                        player,
                        points: 0.0,
                    });
                }
            }
        }
        for m in &self.matches {
            let Some(outcome) = m.outcome else { continue };
            let (white_pts, black_pts) = outcome.points();
            for s in table.iter_mut() {
                if s.player == m.white {
                    s.points += white_pts;
                } else if s.player == m.black {
                    s.points += black_pts;
                }
            }
        }
        sort_standings(&mut table);
        table
    }
}
