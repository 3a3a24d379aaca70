//! Cumulative standings over the whole tournament.

use crate::models::{sort_standings, Standing, Tournament};

/// All enrolled players with their running score, highest first. Ties keep
/// enrolment order.
pub fn standings(tournament: &Tournament) -> Vec<Standing> {
    let mut table: Vec<Standing> = tournament
        .players()
        .iter()
        .map(|p| Standing {
            player: p.index,
            points: p.score(),
        })
        .collect();
    sort_standings(&mut table);
    table
}

/// Rebuild every running score from scratch: zero them, then replay each
/// recorded outcome of each round in order.
///
/// Gives the same scores as the incremental updates of `record_result` and
/// `amend_result`; use it after loading or whenever the history was edited
/// outside those paths.
pub fn recompute_scores(tournament: &mut Tournament) {
    for p in tournament.players.iter_mut() {
        p.score = 0.0;
    }
    let credits: Vec<_> = tournament
        .rounds
        .iter()
        .flat_map(|r| r.matches.iter())
        .filter_map(|m| {
            m.outcome.map(|o| {
                let (w, b) = o.points();
                [(m.white, w), (m.black, b)]
            })
        })
        .flatten()
        .collect();
    for (player, points) in credits {
        if tournament.credit(player, points).is_err() {
            log::warn!(
                "{}: match references player {} who is not enrolled",
                tournament.name(),
                player
            );
        }
    }
}
