//! The logger contract and its backends.
//!
//! An application builds exactly one backend and talks to it through
//! [`EventLogger`]. Construction is the only fallible step: once a backend
//! exists, `add` and `tail_last_n` never fail from the caller's side.

/// Backend that discards everything.
pub mod null;
/// Backend over the embedded event store.
pub mod store;
/// Backend that prints to standard output.
pub mod stdout;
/// Backward block scan used by the textfile backend.
pub mod tail;
/// Backend that appends to a text file.
pub mod textfile;

use std::net::{IpAddr, SocketAddr};

use crate::{
    event::local_date,
    types::{Recency, TimestampMs},
};

pub use null::NullEventLogger;
pub use stdout::StdoutEventLogger;
pub use store::StoreEventLogger;
pub use textfile::TextfileEventLogger;

/// Human-readable timestamp layout used in formatted lines.
pub const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Uniform contract implemented by every backend.
///
/// All methods take `&self`; backends synchronise internally so a single
/// instance can be shared as `Arc<dyn EventLogger>`.
pub trait EventLogger: Send + Sync {
    /// Records an event with an empty address.
    fn add(&self, message: &str) -> String {
        self.add_with_address("", message)
    }

    /// Records an event and returns the line as written, or `""` when the
    /// logger is inactive.
    fn add_with_address(&self, address: &str, message: &str) -> String;

    /// Records an event using the caller's remote address.
    fn add_from(&self, source: &dyn RemoteAddr, message: &str) -> String {
        self.add_with_address(&source.remote_addr(), message)
    }

    /// Most recent entries; the meaning of `n` is backend-defined.
    fn tail_last_n(&self, n: Recency) -> Vec<String>;

    /// Resumes recording.
    fn enable(&self);

    /// Suspends recording; `add` returns `""` until [`enable`](Self::enable).
    fn disable(&self);

    /// Whether `add` currently records.
    fn is_active(&self) -> bool;

    /// Releases backend resources. Call at most once, with no concurrent
    /// operations in flight.
    fn shutdown(&self);
}

/// Anything that can name the remote peer of a request.
pub trait RemoteAddr {
    /// Remote address as text.
    fn remote_addr(&self) -> String;
}

impl RemoteAddr for IpAddr {
    fn remote_addr(&self) -> String {
        self.to_string()
    }
}

impl RemoteAddr for SocketAddr {
    fn remote_addr(&self) -> String {
        self.ip().to_string()
    }
}

impl RemoteAddr for String {
    fn remote_addr(&self) -> String {
        self.clone()
    }
}

/// Removes every `(` and `)` then wraps the rest in one pair.
pub fn paren_address(address: &str) -> String {
    let stripped: String = address.chars().filter(|c| *c != '(' && *c != ')').collect();
    format!("({stripped})")
}

/// Formats `<date> (<address>) <message>` for the given instant.
///
/// Line breaks in the message become spaces so one event is always one
/// line. The result is trimmed.
pub fn format_line(time: TimestampMs, address: &str, message: &str) -> String {
    let date = local_date(time, DATE_FORMAT);
    let message = message.replace(['\r', '\n'], " ");
    format!("{date} {} {message}", paren_address(address))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parens_are_stripped_then_wrapped_once() {
        assert_eq!(paren_address("(1.2.3.4)"), "(1.2.3.4)");
        assert_eq!(paren_address("a(b)c))"), "(abc)");
        assert_eq!(paren_address(""), "()");
    }

    #[test]
    fn newlines_never_reach_the_line() {
        let line = format_line(0, "h", "one\ntwo\r\nthree");
        assert!(!line.contains('\n'));
        assert!(line.ends_with("(h) one two  three"));
    }

    #[test]
    fn socket_addr_reports_ip_only() {
        let sock: SocketAddr = "192.168.1.9:8080".parse().unwrap();
        assert_eq!(sock.remote_addr(), "192.168.1.9");
    }
}
