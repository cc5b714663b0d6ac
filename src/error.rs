use std::path::PathBuf;

use thiserror::Error;

use crate::persist::PersistError;

/// Raised when a backend cannot be brought up.
///
/// Only constructors return this; once a logger exists its operations are
/// infallible from the caller's side.
#[derive(Error, Debug)]
pub enum EventLoggerError {
    /// The event file exists but cannot be written to.
    #[error("event file cannot be written to: {}", path.display())]
    NotWritable {
        /// Offending path.
        path: PathBuf,
    },
    /// Creating or opening the event file failed.
    #[error("logger deactivated, cannot create or open event file {}: {source}", path.display())]
    Open {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The embedded store could not be opened.
    #[error("cannot open event store: {0}")]
    Store(#[from] PersistError),
    /// A logger configuration document could not be parsed.
    #[error("invalid logger config: {0}")]
    Config(#[from] serde_json::Error),
}
