//! JSON persistence: whole-file rewrites under a data directory.
//!
//! Layout:
//! - `tournaments.json`: directory index, keyed by tournament name
//! - `tournaments/<stem>.json`: one tournament with its rounds
//! - `tournaments/<stem>_joueurs.json`: that tournament's enrolled players
//! - `players.json`: the player registry
//! - `exports/<stem>_export.json`: tournaments written by [`JsonStore::export`]

mod record;

pub use record::{BaseRecord, MatchRecord, RoundRecord, StandingRecord, TournamentRecord};

use crate::models::{Player, PlayerRegistry, Tournament, TournamentDetails, TournamentError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Failure reading or writing a data file.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {}", e),
            StoreError::Json(e) => write!(f, "malformed JSON: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

impl From<StoreError> for TournamentError {
    fn from(e: StoreError) -> Self {
        TournamentError::Storage(e.to_string())
    }
}

/// Where tournaments are kept between sessions.
pub trait TournamentStore {
    /// Write one tournament (details, rounds, enrolled players).
    fn save(&self, tournament: &Tournament) -> Result<(), StoreError>;
    /// Read one tournament by name; `Ok(None)` if it was never saved.
    fn load(&self, name: &str) -> Result<Option<Tournament>, StoreError>;
    /// Delete a tournament's files. Missing files are not an error.
    fn remove(&self, name: &str) -> Result<(), StoreError>;
    /// Write the directory index.
    fn save_index(&self, tournaments: &[Tournament]) -> Result<(), StoreError>;
    /// Read the directory index, ordered by stored index.
    fn load_index(&self) -> Result<Vec<TournamentDetails>, StoreError>;

    /// Key a tournament name is stored under. Two tournaments whose names
    /// share a key would overwrite each other.
    fn key(&self, name: &str) -> String {
        name.to_string()
    }
}

/// File-system store rooted at a data directory.
#[derive(Clone, Debug)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join("tournaments.json")
    }

    fn registry_path(&self) -> PathBuf {
        self.root.join("players.json")
    }

    fn tournament_path(&self, name: &str) -> PathBuf {
        self.root
            .join("tournaments")
            .join(format!("{}.json", file_stem(name)))
    }

    fn roster_path(&self, name: &str) -> PathBuf {
        self.root
            .join("tournaments")
            .join(format!("{}_joueurs.json", file_stem(name)))
    }

    /// Load the registry; an absent file is an empty registry.
    pub fn load_players(&self) -> Result<PlayerRegistry, StoreError> {
        Ok(read_json(&self.registry_path())?.unwrap_or_default())
    }

    pub fn save_players(&self, registry: &PlayerRegistry) -> Result<(), StoreError> {
        write_json(&self.registry_path(), registry)
    }

    /// Write a standalone copy of a tournament to the exports folder.
    pub fn export(&self, tournament: &Tournament) -> Result<PathBuf, StoreError> {
        let path = self
            .root
            .join("exports")
            .join(format!("{}_export.json", file_stem(tournament.name())));
        write_json(&path, &TournamentRecord::from_tournament(tournament))?;
        log::info!("{}: exported to {}", tournament.name(), path.display());
        Ok(path)
    }

    /// Read a tournament record written by [`JsonStore::export`] or copied
    /// from the tournaments folder.
    pub fn read_export(path: &Path) -> Result<TournamentRecord, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl TournamentStore for JsonStore {
    fn save(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let name = tournament.name();
        write_json(&self.roster_path(name), &tournament.players())?;
        write_json(
            &self.tournament_path(name),
            &TournamentRecord::from_tournament(tournament),
        )
    }

    fn load(&self, name: &str) -> Result<Option<Tournament>, StoreError> {
        let Some(record) = read_json::<TournamentRecord>(&self.tournament_path(name))? else {
            return Ok(None);
        };
        let roster: Vec<Player> = read_json(&self.roster_path(name))?.unwrap_or_default();
        Ok(Some(record.into_tournament(roster)))
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        for path in [self.tournament_path(name), self.roster_path(name)] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn save_index(&self, tournaments: &[Tournament]) -> Result<(), StoreError> {
        let index: BTreeMap<&str, BaseRecord> = tournaments
            .iter()
            .map(|t| (t.name(), BaseRecord::from_tournament(t)))
            .collect();
        write_json(&self.index_path(), &index)
    }

    fn load_index(&self) -> Result<Vec<TournamentDetails>, StoreError> {
        let index: BTreeMap<String, BaseRecord> =
            read_json(&self.index_path())?.unwrap_or_default();
        let mut bases: Vec<BaseRecord> = index.into_values().collect();
        bases.sort_by_key(|b| b.index);
        Ok(bases.iter().map(BaseRecord::details).collect())
    }

    fn key(&self, name: &str) -> String {
        file_stem(name)
    }
}

/// File name for a tournament: anything but letters, digits, '-' and '_'
/// becomes '_'.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
