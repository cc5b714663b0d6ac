//! SQLite-backed event store indexed by time.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::{
    event::Event,
    types::TimestampMs,
};

use super::{PersistError, PersistResult, StoreConfig};

/// Schema version written by this build.
///
/// Version 1 stored events without the time index; version 2 adds it.
pub const SCHEMA_VERSION: u32 = 2;

const UPGRADE_V1_TO_V2: &str = "CREATE INDEX IF NOT EXISTS events_time_idx ON events(time);";

/// Event table plus time index in a single SQLite file.
pub struct SqliteEventStore {
    conn: Connection,
    config: StoreConfig,
}

impl SqliteEventStore {
    /// Opens or creates a store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>, config: &StoreConfig) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn, config)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory(config: &StoreConfig) -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn, config)
    }

    fn init_connection(conn: Connection, config: &StoreConfig) -> PersistResult<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        match found {
            0 => {
                conn.execute_batch(include_str!("schema.sql"))?;
            }
            SCHEMA_VERSION => {}
            v if v > SCHEMA_VERSION => {
                return Err(PersistError::SchemaVersion {
                    found: v,
                    supported: SCHEMA_VERSION,
                });
            }
            v if !config.allow_version_updates => {
                return Err(PersistError::UpgradeRefused {
                    found: v,
                    supported: SCHEMA_VERSION,
                });
            }
            v => {
                if config.logs_lifecycle() {
                    tracing::info!(from = v, to = SCHEMA_VERSION, "upgrading event store schema");
                }
                conn.execute_batch(UPGRADE_V1_TO_V2)?;
            }
        }
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        if config.logs_lifecycle() {
            tracing::info!(schema_version = SCHEMA_VERSION, "event store opened");
        }

        Ok(Self {
            conn,
            config: config.clone(),
        })
    }

    /// Persists one event and returns its row id.
    pub fn insert(&self, event: &Event) -> PersistResult<i64> {
        self.conn.execute(
            "INSERT INTO events(time, address, message) VALUES (?1, ?2, ?3)",
            params![event.time(), event.address(), event.message()],
        )?;
        let id = self.conn.last_insert_rowid();
        if self.config.logs_writes() {
            tracing::debug!(id, time = event.time(), "event stored");
        }
        Ok(id)
    }

    /// Loads every event strictly newer than `cutoff`, newest first.
    ///
    /// Events sharing a timestamp compare equal; their relative order is
    /// unspecified.
    pub fn events_after(&self, cutoff: TimestampMs) -> PersistResult<Vec<Event>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT time, address, message FROM events WHERE time > ?1 ORDER BY time DESC",
        )?;

        let rows = stmt.query_map(params![cutoff], |row| {
            let time: i64 = row.get(0)?;
            let address: String = row.get(1)?;
            let message: String = row.get(2)?;
            Ok(Event::at(time, address, message))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        if self.config.logs_queries() {
            tracing::trace!(cutoff, matched = out.len(), "event window query");
        }
        Ok(out)
    }

    /// Number of stored events.
    pub fn count(&self) -> PersistResult<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Closes the connection, surfacing any error SQLite reports.
    pub fn close(self) -> PersistResult<()> {
        let logs = self.config.logs_lifecycle();
        self.conn.close().map_err(|(_, err)| PersistError::from(err))?;
        if logs {
            tracing::info!("event store closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_query_is_newest_first_and_exclusive() {
        let store = SqliteEventStore::open_in_memory(&StoreConfig::default()).unwrap();
        store.insert(&Event::at(100, "a", "one")).unwrap();
        store.insert(&Event::at(300, "c", "three")).unwrap();
        store.insert(&Event::at(200, "b", "two")).unwrap();

        let got = store.events_after(100).unwrap();
        let times: Vec<_> = got.iter().map(Event::time).collect();
        assert_eq!(times, vec![300, 200]);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn fresh_store_gets_current_schema_version() {
        let store = SqliteEventStore::open_in_memory(&StoreConfig::default()).unwrap();
        let v: u32 = store
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(v, SCHEMA_VERSION);
    }
}
