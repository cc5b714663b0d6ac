use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::types::{Recency, now_ms};

use super::{EventLogger, format_line};

/// Fixed reply for `tail_last_n`; printed lines are not kept.
pub const STDOUT_LAST_N: [&str; 1] = ["StdoutEventLogger cannot return LastN events"];

/// Prints one formatted line per event.
///
/// Defaults to standard output; [`with_writer`](Self::with_writer) points it
/// at any other sink. Writes are serialised per instance so concurrent
/// callers never interleave within a line.
pub struct StdoutEventLogger<W: Write + Send = Stdout> {
    out: Mutex<W>,
    active: AtomicBool,
}

impl StdoutEventLogger<Stdout> {
    /// Creates a logger on standard output and records "Logger started".
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for StdoutEventLogger<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> StdoutEventLogger<W> {
    /// Creates a logger on `out` and records "Logger started".
    pub fn with_writer(out: W) -> Self {
        let logger = Self {
            out: Mutex::new(out),
            active: AtomicBool::new(true),
        };
        logger.add("Logger started");
        logger
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> EventLogger for StdoutEventLogger<W> {
    fn add_with_address(&self, address: &str, message: &str) -> String {
        if !self.active.load(Ordering::Acquire) {
            return String::new();
        }
        let line = format_line(now_ms(), address, message);
        let mut out = self.out.lock();
        if let Err(err) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(error = %err, "failed to print event");
        }
        line
    }

    fn tail_last_n(&self, _n: Recency) -> Vec<String> {
        STDOUT_LAST_N.iter().map(|s| s.to_string()).collect()
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
        self.add("Logger shutting down");
    }
}
