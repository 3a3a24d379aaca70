//! Rounds: creation through pairing, result entry and amendment, deletion.

use crate::logic::pairing::PairingStrategy;
use crate::logic::standings::recompute_scores;
use crate::models::{
    GameMatch, InvalidOutcome, Outcome, Round, Tournament, TournamentError, TournamentStatus,
};
use chrono::Local;

/// Fewest enrolled players for which a round can be paired.
pub const MIN_PLAYERS_FOR_ROUND: usize = 8;

/// Pair the enrolled players into a new round and append it.
///
/// Fails without touching the tournament when all configured rounds exist,
/// when fewer than [`MIN_PLAYERS_FOR_ROUND`] players are enrolled, or when the
/// tournament is already completed.
pub fn create_round<'a>(
    tournament: &'a mut Tournament,
    strategy: &mut dyn PairingStrategy,
) -> Result<&'a Round, TournamentError> {
    if tournament.status == TournamentStatus::Completed {
        return Err(TournamentError::InvalidState);
    }
    let round_count = tournament.details.round_count;
    if tournament.rounds.len() >= round_count as usize {
        return Err(TournamentError::MaxRoundsReached { round_count });
    }
    let enrolled = tournament.players.len();
    if enrolled < MIN_PLAYERS_FOR_ROUND {
        return Err(TournamentError::NotEnoughPlayers {
            enrolled,
            required: MIN_PLAYERS_FOR_ROUND,
        });
    }

    let pairings = strategy.pair(&tournament.players, &tournament.rounds);
    let number = tournament.rounds.len() as u32 + 1;
    let matches = pairings
        .pairs
        .iter()
        .map(|&(white, black)| GameMatch::new(white, black))
        .collect();
    let mut round = Round::new(number, Local::now().naive_local(), matches);
    round.bye = pairings.bye;

    if let Some(bye) = round.bye {
        log::info!(
            "{}: player {} receives a bye in round {}",
            tournament.name(),
            bye,
            number
        );
    }
    log::info!(
        "{}: round {} created with {} matches",
        tournament.name(),
        number,
        round.matches.len()
    );

    tournament.rounds.push(round);
    Ok(&tournament.rounds[tournament.rounds.len() - 1])
}

/// Record the result of a match that has none yet.
///
/// `position` is 1-based within the round. A match that already has a result
/// is rejected with [`TournamentError::ResultAlreadyRecorded`]; use
/// [`amend_result`] to correct it. When the last open match of the round gets
/// its result, the round completes and takes its standings snapshot.
pub fn record_result(
    tournament: &mut Tournament,
    round: u32,
    position: usize,
    code: &str,
) -> Result<Outcome, TournamentError> {
    let m = match_at(tournament, round, position)?;
    let outcome = parse_outcome(code)?;
    if m.is_played() {
        return Err(TournamentError::ResultAlreadyRecorded { round, position });
    }
    set_outcome(tournament, round, position, outcome)?;
    Ok(outcome)
}

/// Replace the result of a match, reversing the points of the previous
/// result first. Works on open matches too, where it behaves like
/// [`record_result`].
pub fn amend_result(
    tournament: &mut Tournament,
    round: u32,
    position: usize,
    code: &str,
) -> Result<Outcome, TournamentError> {
    match_at(tournament, round, position)?;
    let outcome = parse_outcome(code)?;
    set_outcome(tournament, round, position, outcome)?;
    Ok(outcome)
}

/// Remove a round, renumber the following ones and replay all scores.
pub fn delete_round(tournament: &mut Tournament, number: u32) -> Result<Round, TournamentError> {
    tournament.round(number)?;
    let removed = tournament.rounds.remove(number as usize - 1);
    for (i, r) in tournament.rounds.iter_mut().enumerate() {
        r.number = i as u32 + 1;
    }
    recompute_scores(tournament);
    log::info!("{}: round {} deleted", tournament.name(), number);
    Ok(removed)
}

fn parse_outcome(code: &str) -> Result<Outcome, TournamentError> {
    code.parse()
        .map_err(|InvalidOutcome(code)| TournamentError::InvalidResult(code))
}

fn match_at(
    tournament: &Tournament,
    round: u32,
    position: usize,
) -> Result<&GameMatch, TournamentError> {
    let r = tournament.round(round)?;
    position
        .checked_sub(1)
        .and_then(|i| r.matches.get(i))
        .ok_or(TournamentError::MatchNotFound { round, position })
}

/// Apply `outcome` to a match: take back the previous result's points, credit
/// the new ones, then refresh the round's status and snapshot.
fn set_outcome(
    tournament: &mut Tournament,
    round: u32,
    position: usize,
    outcome: Outcome,
) -> Result<(), TournamentError> {
    let (white, black, previous) = {
        let m = match_at(tournament, round, position)?;
        (m.white, m.black, m.outcome)
    };
    // Check both players before touching either score.
    for p in [white, black] {
        if tournament.get_player(p).is_none() {
            return Err(TournamentError::PlayerNotFound(p));
        }
    }

    if let Some(prev) = previous {
        let (w, b) = prev.points();
        tournament.credit(white, -w)?;
        tournament.credit(black, -b)?;
    }
    let (w, b) = outcome.points();
    tournament.credit(white, w)?;
    tournament.credit(black, b)?;

    let name = tournament.details.name.clone();
    let r = tournament.round_mut(round)?;
    r.matches[position - 1].outcome = Some(outcome);
    log::info!(
        "{}: round {} match {} ({} - {}) result {}",
        name,
        round,
        position,
        white,
        black,
        outcome
    );

    if r.is_completed() {
        r.standings = r.local_standings();
    } else if r.all_results_in() {
        r.complete();
        log::info!("{}: round {} completed", name, round);
    }
    Ok(())
}
