use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
    error::EventLoggerError,
    event::Event,
    persist::{PersistError, PersistResult, StoreConfig, sqlite::SqliteEventStore},
    types::{Recency, TimestampMs, now_ms},
};

use super::EventLogger;

/// Persists events in the embedded store, indexed by time.
///
/// Here `tail_last_n(n)` means "events from the last `n` seconds", newest
/// first, each rendered with [`Event`]'s `Display` form.
pub struct StoreEventLogger {
    store: Mutex<Option<SqliteEventStore>>,
    active: AtomicBool,
}

impl StoreEventLogger {
    /// Opens or creates the store file at `path`.
    pub fn open(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self, EventLoggerError> {
        let store = SqliteEventStore::open(path, config)?;
        Ok(Self::from_store(store))
    }

    /// Opens a store that lives only as long as this logger.
    pub fn open_in_memory(config: &StoreConfig) -> Result<Self, EventLoggerError> {
        let store = SqliteEventStore::open_in_memory(config)?;
        Ok(Self::from_store(store))
    }

    fn from_store(store: SqliteEventStore) -> Self {
        Self {
            store: Mutex::new(Some(store)),
            active: AtomicBool::new(true),
        }
    }

    fn with_store<T>(&self, f: impl FnOnce(&SqliteEventStore) -> PersistResult<T>) -> PersistResult<T> {
        let guard = self.store.lock();
        let store = guard.as_ref().ok_or(PersistError::Closed)?;
        f(store)
    }

    /// Stores a pre-built event, keeping its timestamp. Returns the default
    /// formatted form, or `""` when inactive or on failure.
    pub fn record(&self, event: &Event) -> String {
        if !self.active.load(Ordering::Acquire) {
            return String::new();
        }
        match self.with_store(|store| store.insert(event)) {
            Ok(_) => event.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to store event");
                String::new()
            }
        }
    }

    /// Events newer than `seconds` ago, newest first.
    pub fn events_within(&self, seconds: Recency) -> Vec<Event> {
        let cutoff = window_cutoff(now_ms(), seconds);
        self.with_store(|store| store.events_after(cutoff))
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "event window query failed");
                Vec::new()
            })
    }

    /// Number of stored events; zero once shut down.
    pub fn count(&self) -> u64 {
        self.with_store(SqliteEventStore::count).unwrap_or(0)
    }
}

fn window_cutoff(now: TimestampMs, seconds: Recency) -> TimestampMs {
    let span = i64::try_from(seconds)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000);
    now.saturating_sub(span)
}

impl EventLogger for StoreEventLogger {
    fn add_with_address(&self, address: &str, message: &str) -> String {
        self.record(&Event::new(address, message))
    }

    fn tail_last_n(&self, n: Recency) -> Vec<String> {
        self.events_within(n).iter().map(Event::to_string).collect()
    }

    fn enable(&self) {
        self.active.store(true, Ordering::Release);
    }

    fn disable(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn shutdown(&self) {
        let Some(store) = self.store.lock().take() else {
            return;
        };
        if let Err(err) = store.close() {
            tracing::warn!(error = %err, "failed to close event store");
        }
    }
}
