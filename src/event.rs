//! The event record shared by every backend.

use std::fmt;

use chrono::{DateTime, Local};

use crate::types::{TimestampMs, now_ms};

/// One logged event: when, from where, and what.
///
/// Fields are private so an event cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    time: TimestampMs,
    address: String,
    message: String,
}

impl Event {
    /// Creates an event stamped with the current time.
    pub fn new(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(now_ms(), address, message)
    }

    /// Creates an event with no originator address.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new("", message)
    }

    /// Creates an event with an explicit timestamp, e.g. when importing or
    /// replaying records.
    pub fn at(time: TimestampMs, address: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            time,
            address: address.into(),
            message: message.into(),
        }
    }

    /// Creation time in milliseconds since the epoch.
    pub fn time(&self) -> TimestampMs {
        self.time
    }

    /// Originator address, possibly empty.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Free-text message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renders `<date> <address> <message>` with the time in local time,
    /// laid out by the `chrono` pattern `date_format`.
    ///
    /// ```
    /// use eventlog::Event;
    ///
    /// let ev = Event::new("10.0.0.1", "login ok");
    /// let line = ev.format_with("%Y-%m-%d");
    /// assert!(line.ends_with(" 10.0.0.1 login ok"));
    /// ```
    pub fn format_with(&self, date_format: &str) -> String {
        let date = local_date(self.time, date_format);
        format!("{date} {} {}", self.address, self.message)
    }
}

/// Formats `time` in local time; falls back to the raw millis when out of range.
pub(crate) fn local_date(time: TimestampMs, date_format: &str) -> String {
    DateTime::from_timestamp_millis(time)
        .map(|utc| utc.with_timezone(&Local).format(date_format).to_string())
        .unwrap_or_else(|| time.to_string())
}

/// Default form: `<time> <address> <message>` with the raw millisecond time.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.time, self.address, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_raw_millis() {
        let ev = Event::at(1_700_000_000_123, "10.0.0.1", "hello");
        assert_eq!(ev.to_string(), "1700000000123 10.0.0.1 hello");
    }

    #[test]
    fn format_with_renders_local_date() {
        let ev = Event::at(1_700_000_000_123, "10.0.0.1", "hello");
        let expected_date = DateTime::from_timestamp_millis(1_700_000_000_123)
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(
            ev.format_with("%Y-%m-%d %H:%M:%S"),
            format!("{expected_date} 10.0.0.1 hello")
        );
        assert!(ev.format_with("%Y").starts_with("2023 "));
    }

    #[test]
    fn from_message_has_empty_address() {
        let ev = Event::from_message("boot");
        assert_eq!(ev.address(), "");
        assert_eq!(ev.message(), "boot");
        assert!(ev.time() > 0);
    }
}
