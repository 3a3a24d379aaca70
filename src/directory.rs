//! Tournament directory: every tournament of the session, by index.
//!
//! Each state-changing operation is applied in memory first and then saved.
//! If the save fails the change is kept and [`TournamentError::Storage`] is
//! returned, so the caller knows the files are behind.

use crate::logic::{self, PairingStrategy};
use crate::models::{
    Outcome, PlayerIndex, PlayerLookup, Round, Standing, Tournament, TournamentDetails,
    TournamentError,
};
use crate::store::{JsonStore, TournamentRecord, TournamentStore};
use std::path::{Path, PathBuf};

/// Most tournaments a directory will hold.
pub const MAX_TOURNAMENTS: usize = 30;

pub struct TournamentDirectory<S: TournamentStore> {
    store: S,
    tournaments: Vec<Tournament>,
}

impl<S: TournamentStore> TournamentDirectory<S> {
    /// Empty directory; nothing is read from the store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            tournaments: Vec::new(),
        }
    }

    /// Load every tournament listed in the store's index.
    ///
    /// An unreadable index gives an empty directory. A tournament whose own
    /// file is missing or unreadable comes back with its details only.
    pub fn load(store: S) -> Self {
        let details = match store.load_index() {
            Ok(d) => d,
            Err(e) => {
                log::error!("Could not read tournament index, starting empty: {}", e);
                Vec::new()
            }
        };
        let mut tournaments = Vec::with_capacity(details.len());
        for d in details {
            let t = match store.load(&d.name) {
                Ok(Some(t)) => t,
                Ok(None) => {
                    log::warn!("{}: no tournament file, loading details only", d.name);
                    Tournament::new(0, d)
                }
                Err(e) => {
                    log::error!("{}: could not read tournament file: {}", d.name, e);
                    Tournament::new(0, d)
                }
            };
            tournaments.push(t);
        }
        let mut dir = Self { store, tournaments };
        dir.reindex();
        log::info!("Loaded {} tournament(s)", dir.tournaments.len());
        dir
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    pub fn get(&self, index: usize) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .get(index)
            .ok_or(TournamentError::TournamentNotFound(index))
    }

    /// Create a tournament and return its index.
    pub fn add(&mut self, details: TournamentDetails) -> Result<usize, TournamentError> {
        details.validate()?;
        if self.tournaments.len() >= MAX_TOURNAMENTS {
            return Err(TournamentError::TooManyTournaments {
                max: MAX_TOURNAMENTS,
            });
        }
        self.check_name_free(&details.name, None)?;
        let index = self.tournaments.len();
        log::info!("{}: tournament created", details.name);
        self.tournaments.push(Tournament::new(index, details));
        self.persist(index)?;
        self.persist_index()?;
        Ok(index)
    }

    /// Append a tournament read from a record file and return its index.
    /// Enrolled players are taken from `registry`; unknown ones are skipped.
    pub fn import(
        &mut self,
        record: TournamentRecord,
        registry: &impl PlayerLookup,
    ) -> Result<usize, TournamentError> {
        let details = record.base.details();
        details.validate()?;
        if self.tournaments.len() >= MAX_TOURNAMENTS {
            return Err(TournamentError::TooManyTournaments {
                max: MAX_TOURNAMENTS,
            });
        }
        self.check_name_free(&details.name, None)?;
        if record.players.len() > details.max_players {
            return Err(TournamentError::InvalidDetails(format!(
                "{} players enrolled but at most {} allowed",
                record.players.len(),
                details.max_players
            )));
        }

        let roster = record
            .players
            .iter()
            .filter_map(|&p| registry.lookup_by_index(p).cloned())
            .collect();
        let mut tournament = record.into_tournament(roster);
        let index = self.tournaments.len();
        tournament.index = index;
        log::info!(
            "{}: tournament imported with {} round(s)",
            tournament.name(),
            tournament.rounds().len()
        );
        self.tournaments.push(tournament);
        self.persist(index)?;
        self.persist_index()?;
        Ok(index)
    }

    /// Remove a tournament and its files; the others are renumbered from 0.
    pub fn delete(&mut self, index: usize) -> Result<Tournament, TournamentError> {
        self.get(index)?;
        let removed = self.tournaments.remove(index);
        self.reindex();
        log::info!("{}: tournament deleted", removed.name());

        let mut result = self.store.remove(removed.name()).map_err(TournamentError::from);
        for i in index..self.tournaments.len() {
            result = result.and(self.persist(i));
        }
        result.and(self.persist_index())?;
        Ok(removed)
    }

    /// Change a tournament's details. A new name moves its files.
    pub fn update_details(
        &mut self,
        index: usize,
        details: TournamentDetails,
    ) -> Result<(), TournamentError> {
        self.check_name_free(&details.name, Some(index))?;
        let old_name = self.get(index)?.name().to_string();
        self.tournaments[index].update_details(details)?;

        let mut result = Ok(());
        if old_name != self.tournaments[index].name() {
            result = self.store.remove(&old_name).map_err(TournamentError::from);
        }
        result.and(self.persist(index)).and(self.persist_index())
    }

    /// Enrol a registered player.
    pub fn enroll(
        &mut self,
        index: usize,
        player: PlayerIndex,
        registry: &impl PlayerLookup,
    ) -> Result<(), TournamentError> {
        let player = registry
            .lookup_by_index(player)
            .ok_or(TournamentError::PlayerNotFound(player))?;
        self.mutate(index, |t| t.add_player(player))
    }

    pub fn withdraw(&mut self, index: usize, player: PlayerIndex) -> Result<(), TournamentError> {
        self.mutate(index, |t| t.withdraw_player(player))
    }

    /// Pair a new round; returns its number.
    pub fn create_round(
        &mut self,
        index: usize,
        strategy: &mut dyn PairingStrategy,
    ) -> Result<u32, TournamentError> {
        self.mutate(index, |t| logic::create_round(t, strategy).map(|r| r.number))
    }

    pub fn record_result(
        &mut self,
        index: usize,
        round: u32,
        position: usize,
        code: &str,
    ) -> Result<Outcome, TournamentError> {
        self.mutate(index, |t| logic::record_result(t, round, position, code))
    }

    pub fn amend_result(
        &mut self,
        index: usize,
        round: u32,
        position: usize,
        code: &str,
    ) -> Result<Outcome, TournamentError> {
        self.mutate(index, |t| logic::amend_result(t, round, position, code))
    }

    pub fn delete_round(&mut self, index: usize, number: u32) -> Result<Round, TournamentError> {
        self.mutate(index, |t| logic::delete_round(t, number))
    }

    pub fn start(&mut self, index: usize) -> Result<(), TournamentError> {
        self.mutate(index, logic::start_tournament)
    }

    pub fn finish(&mut self, index: usize) -> Result<(), TournamentError> {
        self.mutate(index, logic::finish_tournament)
    }

    pub fn round(&self, index: usize, number: u32) -> Result<&Round, TournamentError> {
        self.get(index)?.round(number)
    }

    /// Cumulative standings of one tournament.
    pub fn standings(&self, index: usize) -> Result<Vec<Standing>, TournamentError> {
        Ok(logic::standings(self.get(index)?))
    }

    fn mutate<T>(
        &mut self,
        index: usize,
        op: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let t = self
            .tournaments
            .get_mut(index)
            .ok_or(TournamentError::TournamentNotFound(index))?;
        let value = op(t)?;
        self.persist(index)?;
        Ok(value)
    }

    /// Names clash when the store would file them under the same key.
    fn check_name_free(&self, name: &str, except: Option<usize>) -> Result<(), TournamentError> {
        let key = self.store.key(name);
        let clash = self
            .tournaments
            .iter()
            .find(|t| Some(t.index) != except && self.store.key(t.name()) == key);
        if let Some(t) = clash {
            return Err(TournamentError::InvalidDetails(format!(
                "'{}' would share its files with tournament '{}'",
                name,
                t.name()
            )));
        }
        Ok(())
    }

    fn reindex(&mut self) {
        for (i, t) in self.tournaments.iter_mut().enumerate() {
            t.index = i;
        }
    }

    fn persist(&self, index: usize) -> Result<(), TournamentError> {
        let t = &self.tournaments[index];
        self.store.save(t).map_err(|e| {
            log::error!("{}: could not save tournament: {}", t.name(), e);
            TournamentError::from(e)
        })
    }

    fn persist_index(&self) -> Result<(), TournamentError> {
        self.store.save_index(&self.tournaments).map_err(|e| {
            log::error!("Could not save tournament index: {}", e);
            TournamentError::from(e)
        })
    }
}

impl TournamentDirectory<JsonStore> {
    /// Export one tournament; returns the written file.
    pub fn export(&self, index: usize) -> Result<PathBuf, TournamentError> {
        let t = self.get(index)?;
        self.store.export(t).map_err(|e| {
            log::error!("{}: could not export tournament: {}", t.name(), e);
            TournamentError::from(e)
        })
    }

    /// Import a tournament from a record file.
    pub fn import_file(
        &mut self,
        path: &Path,
        registry: &impl PlayerLookup,
    ) -> Result<usize, TournamentError> {
        let record = JsonStore::read_export(path).map_err(|e| {
            log::error!("Could not read {}: {}", path.display(), e);
            TournamentError::from(e)
        })?;
        self.import(record, registry)
    }
}
