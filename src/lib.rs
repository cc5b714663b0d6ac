//! Simple server-side event logging with interchangeable backends.
//!
//! Every backend implements [`logger::EventLogger`]. Pick one at start-up:
//! discard everything, print to stdout, append to a text file, or persist in
//! an embedded SQLite store indexed by time.
//!
//! # Examples
//!
//! Text file with a tail read:
//! ```no_run
//! use eventlog::logger::{EventLogger, TextfileEventLogger};
//!
//! let log = TextfileEventLogger::open("/var/log/app-events.log", true)?;
//! log.add_with_address("10.0.0.7", "login ok");
//! for line in log.tail_last_n(10) {
//!     println!("{line}");
//! }
//! log.shutdown();
//! # Ok::<(), eventlog::EventLoggerError>(())
//! ```
//!
//! Embedded store, where the tail is the last `n` seconds:
//! ```
//! use eventlog::{
//!     logger::{EventLogger, StoreEventLogger},
//!     persist::StoreConfig,
//! };
//!
//! let log = StoreEventLogger::open_in_memory(&StoreConfig::default())?;
//! log.add("cache warmed");
//! assert_eq!(log.tail_last_n(60).len(), 1);
//! log.shutdown();
//! # Ok::<(), eventlog::EventLoggerError>(())
//! ```
#![deny(missing_docs)]

/// Backend selection from plain data.
pub mod config;
/// Construction error type.
pub mod error;
/// Event record.
pub mod event;
/// Logger contract and backends.
pub mod logger;
/// Embedded store and its options.
pub mod persist;
/// Async command loop for tokio hosts.
pub mod runtime;
/// Shared aliases and the clock.
pub mod types;

pub use error::EventLoggerError;
pub use event::Event;
pub use logger::EventLogger;
