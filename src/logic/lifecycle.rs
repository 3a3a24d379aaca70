//! Lifecycle: start and finish a tournament. Both are explicit operator actions.

use crate::models::{Tournament, TournamentError, TournamentStatus};

/// Pending -> InProgress.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Pending {
        return Err(TournamentError::InvalidState);
    }
    tournament.status = TournamentStatus::InProgress;
    log::info!("{}: tournament started", tournament.name());
    Ok(())
}

/// InProgress -> Completed. Not triggered by the last round completing.
pub fn finish_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    tournament.status = TournamentStatus::Completed;
    log::info!("{}: tournament finished", tournament.name());
    Ok(())
}
