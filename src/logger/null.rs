use crate::types::Recency;

use super::EventLogger;

/// Fixed reply for `tail_last_n` on a logger that keeps nothing.
pub const NULL_LAST_N: [&str; 1] = ["NullEventLogger cannot return LastN events"];

/// Discards every event.
///
/// Lets calling code log unconditionally; swap in a real backend later
/// without touching call sites.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventLogger;

impl NullEventLogger {
    /// Creates the logger.
    pub fn new() -> Self {
        Self
    }
}

impl EventLogger for NullEventLogger {
    fn add_with_address(&self, _address: &str, _message: &str) -> String {
        String::new()
    }

    fn tail_last_n(&self, _n: Recency) -> Vec<String> {
        NULL_LAST_N.iter().map(|s| s.to_string()).collect()
    }

    fn enable(&self) {}

    fn disable(&self) {}

    fn is_active(&self) -> bool {
        false
    }

    fn shutdown(&self) {}
}
