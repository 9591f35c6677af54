//! Durable snapshots of the bank state.
//!
//! The core depends on persistence only through this trait: one load at
//! startup, one save after every successful mutation. The snapshot is a
//! single JSON document holding all users, accounts, and transactions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::bank::Store;

/// Errors that can occur while loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub trait SnapshotStore: Send + Sync {
    /// The last saved state, or `None` when no snapshot exists yet.
    fn load(&self) -> Result<Option<Store>, SnapshotError>;

    /// Replace the saved state with `store`.
    fn save(&self, store: &Store) -> Result<(), SnapshotError>;
}

/// Whole-state JSON snapshot in a single file, replaced atomically on save.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFile {
    fn load(&self) -> Result<Option<Store>, SnapshotError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let store = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), "snapshot loaded");
        Ok(Some(store))
    }

    fn save(&self, store: &Store) -> Result<(), SnapshotError> {
        // Write to a temp file in the same directory, then rename over the
        // target: a crash mid-write leaves the previous snapshot intact.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, store)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}

/// Keeps nothing. Tests and benchmarks.
pub struct Discard;

impl SnapshotStore for Discard {
    fn load(&self) -> Result<Option<Store>, SnapshotError> {
        Ok(None)
    }

    fn save(&self, _store: &Store) -> Result<(), SnapshotError> {
        Ok(())
    }
}
