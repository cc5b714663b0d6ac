//! Embedded indexed event store.

/// SQLite implementation of the event store.
pub mod sqlite;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures inside the embedded store.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Error reported by SQLite.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The file was written by a newer schema than this build understands.
    #[error("store schema version {found} is newer than supported version {supported}")]
    SchemaVersion {
        /// Version found on disk.
        found: u32,
        /// Version this build writes.
        supported: u32,
    },
    /// The file needs an upgrade but version updates are disallowed.
    #[error("store schema version {found} needs upgrade to {supported} but version updates are disabled")]
    UpgradeRefused {
        /// Version found on disk.
        found: u32,
        /// Version this build writes.
        supported: u32,
    },
    /// The store has already been closed.
    #[error("store is closed")]
    Closed,
}

/// Result alias for store operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Store open options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Migrate files written by an older schema instead of refusing them.
    pub allow_version_updates: bool,
    /// Diagnostic verbosity: 0 silent, 1 lifecycle, 2 writes, 3 queries.
    pub message_level: u8,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            allow_version_updates: true,
            message_level: 0,
        }
    }
}

impl StoreConfig {
    pub(crate) fn logs_lifecycle(&self) -> bool {
        self.message_level >= 1
    }

    pub(crate) fn logs_writes(&self) -> bool {
        self.message_level >= 2
    }

    pub(crate) fn logs_queries(&self) -> bool {
        self.message_level >= 3
    }
}
