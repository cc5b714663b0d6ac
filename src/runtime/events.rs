//! Runtime event stream payloads.

/// Events emitted from the logger command loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggerEvent {
    /// A line was recorded by the backend.
    Recorded {
        /// Line as returned by the backend.
        line: String,
    },
    /// Recording resumed.
    Enabled,
    /// Recording suspended.
    Disabled,
    /// The backend released its resources; the loop has stopped.
    ShutDown,
}
