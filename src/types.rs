//! Shared primitive aliases and the wall clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the UNIX epoch.
pub type TimestampMs = i64;

/// Recency parameter passed to `tail_last_n`. Lines for file-centric
/// backends, seconds for the store backend.
pub type Recency = usize;

/// Current wall-clock time in milliseconds.
///
/// A clock set before the epoch yields `0`.
pub fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as TimestampMs)
        .unwrap_or(0)
}
