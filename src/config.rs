//! Backend selection from plain data.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    error::EventLoggerError,
    logger::{EventLogger, NullEventLogger, StdoutEventLogger, StoreEventLogger, TextfileEventLogger},
    persist::StoreConfig,
};

/// Which backend to build, and its constructor arguments.
///
/// ```
/// use eventlog::config::LoggerConfig;
///
/// let cfg = LoggerConfig::from_json(r#"{"backend":"textfile","path":"/tmp/events.log"}"#)?;
/// assert!(matches!(cfg, LoggerConfig::Textfile { exceptions_to_stderr: false, .. }));
/// # Ok::<(), eventlog::EventLoggerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum LoggerConfig {
    /// Discard everything.
    Null,
    /// Print to standard output.
    Stdout,
    /// Append to a text file.
    Textfile {
        /// Event file path.
        path: PathBuf,
        /// Echo runtime failures to standard error.
        #[serde(default)]
        exceptions_to_stderr: bool,
    },
    /// Persist in the embedded store.
    Store {
        /// Store file path.
        path: PathBuf,
        /// Store options.
        #[serde(flatten)]
        options: StoreConfig,
    },
}

impl LoggerConfig {
    /// Parses a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, EventLoggerError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Builds the configured backend.
pub fn open_logger(config: &LoggerConfig) -> Result<Box<dyn EventLogger>, EventLoggerError> {
    let logger: Box<dyn EventLogger> = match config {
        LoggerConfig::Null => Box::new(NullEventLogger::new()),
        LoggerConfig::Stdout => Box::new(StdoutEventLogger::new()),
        LoggerConfig::Textfile {
            path,
            exceptions_to_stderr,
        } => Box::new(TextfileEventLogger::open(path, *exceptions_to_stderr)?),
        LoggerConfig::Store { path, options } => Box::new(StoreEventLogger::open(path, options)?),
    };
    Ok(logger)
}

/// Builds the configured backend, falling back to [`NullEventLogger`] when it
/// cannot be brought up.
pub fn open_logger_or_null(config: &LoggerConfig) -> Box<dyn EventLogger> {
    open_logger(config).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "event logger unavailable, discarding events");
        Box::new(NullEventLogger::new())
    })
}
