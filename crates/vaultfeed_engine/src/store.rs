//! Durable record of every entry the pipeline has already announced.
//!
//! The on-disk shape is the one older deployments already have:
//!
//! ```json
//! { "movies": [ { "id": "201", "name": "Movie X", "timestamp": 1893499200000 } ],
//!   "shows":  [ { "id": "101", "name": "Show A" } ] }
//! ```
//!
//! `timestamp` is Unix milliseconds. It is written for movies and carried
//! through unchanged on any show that already has one. There is no locking: two overlapping runs
//! against the same file can lose each other's additions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vaultfeed_core::{Entry, EntryKind, EntryLists};
use vaultfeed_logging::{feed_debug, feed_info};

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read entry store {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("entry store {path:?} is not valid JSON for the expected schema: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("entry store {path:?} failed validation: {reason}")]
    Schema { path: PathBuf, reason: String },
    #[error("failed to write entry store {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
}

pub trait EntryStore: Send + Sync {
    /// Read the persisted entries, initializing an empty store when none exists.
    fn load(&self) -> Result<EntryLists, StoreError>;

    /// Replace the persisted entries with `state`.
    fn save(&self, state: &EntryLists) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PersistedEntry {
    id: String,
    name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PersistedState {
    movies: Vec<PersistedEntry>,
    shows: Vec<PersistedEntry>,
}

impl PersistedState {
    fn from_lists(state: &EntryLists) -> Self {
        let persist = |entry: &Entry| PersistedEntry {
            id: entry.id.clone(),
            name: entry.name.clone(),
            timestamp: entry.discovered_at,
        };
        Self {
            movies: state.movies.iter().map(persist).collect(),
            shows: state.shows.iter().map(persist).collect(),
        }
    }

    fn into_lists(self) -> EntryLists {
        let restore = |kind: EntryKind| {
            move |entry: PersistedEntry| Entry {
                id: entry.id,
                name: entry.name,
                kind,
                discovered_at: entry.timestamp,
            }
        };
        EntryLists {
            shows: self.shows.into_iter().map(restore(EntryKind::Show)).collect(),
            movies: self.movies.into_iter().map(restore(EntryKind::Movie)).collect(),
        }
    }
}

/// JSON file backing for [`EntryStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn schema_error(&self, reason: String) -> StoreError {
        StoreError::Schema {
            path: self.path.clone(),
            reason,
        }
    }

    fn validate(&self, state: &EntryLists) -> Result<(), StoreError> {
        for kind in EntryKind::ALL {
            if let Some(position) = state.sequence(kind).iter().position(|e| e.id.is_empty()) {
                return Err(self.schema_error(format!("{kind} #{position} has an empty id")));
            }
        }
        if let Some((kind, id)) = state.first_duplicate_id() {
            return Err(self.schema_error(format!("{kind} id {id:?} appears more than once")));
        }
        Ok(())
    }
}

impl EntryStore for JsonFileStore {
    fn load(&self) -> Result<EntryLists, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                feed_info!("No entry store at {:?}; starting empty", self.path);
                let empty = EntryLists::new();
                self.save(&empty)?;
                return Ok(empty);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let persisted: PersistedState =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        let state = persisted.into_lists();
        self.validate(&state)?;

        feed_debug!(
            "Loaded {} show(s) and {} movie(s) from {:?}",
            state.shows.len(),
            state.movies.len(),
            self.path
        );
        Ok(state)
    }

    fn save(&self, state: &EntryLists) -> Result<(), StoreError> {
        let to_write_error = |source: PersistError| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        let content = serde_json::to_string(&PersistedState::from_lists(state))
            .map_err(|err| to_write_error(PersistError::Io(err.into())))?;
        AtomicFileWriter::new(&self.path)
            .write(&content)
            .map_err(to_write_error)?;
        feed_debug!(
            "Saved {} show(s) and {} movie(s) to {:?}",
            state.shows.len(),
            state.movies.len(),
            self.path
        );
        Ok(())
    }
}
