//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ColorService (domain)
//! ```
//!
//! Driven adapters (GPIO, clock, UDP socket, log sink) implement these
//! traits.  The [`ColorService`](super::service::ColorService) consumes
//! them via generics, so the domain core never touches hardware or
//! sockets directly and every path can be driven from tests.

use std::io;
use std::net::SocketAddr;

use crate::error::HardwareError;

use super::commands::Rgb;

// ───────────────────────────────────────────────────────────────
// Edge input port (driven adapter: GPIO → domain)
// ───────────────────────────────────────────────────────────────

/// Which way the input's bias resistor pulls an open switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pull {
    /// Open switch reads HIGH; pressing pulls the line to ground.
    Up,
    /// Open switch reads LOW; pressing drives the line HIGH.
    Down,
}

impl Pull {
    /// Whether a raw logical level means "pressed" under this wiring.
    pub fn is_pressed(self, level_high: bool) -> bool {
        match self {
            Self::Up => !level_high,
            Self::Down => level_high,
        }
    }
}

/// A debounced digital input with a sticky "transition happened" flag.
///
/// Debounce is the implementation's business; callers only ever see
/// already-debounced transitions.
pub trait EdgeInput {
    /// Configure the input with the given bias direction.
    fn configure(&mut self, pull: Pull) -> Result<(), HardwareError>;

    /// Return `true` if a transition (either direction) happened since
    /// the previous call, clearing the flag.
    fn poll_edge(&mut self, now_ms: u64) -> Result<bool, HardwareError>;

    /// Debounced logical level (`true` = HIGH) as of the last poll, so
    /// it agrees with the edge that was just reported.
    fn read_level(&mut self) -> Result<bool, HardwareError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Datagram port (driven adapter: socket ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Connectionless request/reply transport with a bounded receive wait.
pub trait DatagramPort {
    /// Wait (bounded by the adapter's poll timeout) for one datagram.
    ///
    /// `Ok(None)` means the wait expired with nothing received; that is
    /// the idle path, not an error.  Oversized datagrams are truncated
    /// to `buf.len()`.
    fn recv_from(&mut self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>>;

    /// Fire-and-forget send.
    fn send_to(&mut self, data: &[u8], addr: SocketAddr) -> io::Result<usize>;

    /// Address the port is bound to, if it has one.
    fn local_addr(&self) -> Option<SocketAddr> {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// Colour source port
// ───────────────────────────────────────────────────────────────

/// Anything that can produce the current colour triple.
pub trait ColorSource {
    /// Sample the current colour.  Hardware sources also drain their
    /// pending edge events here.
    fn sample(&mut self, now_ms: u64) -> Result<Sample, HardwareError>;

    /// Called once per `GET COLOR` answered, after the reply has been
    /// handed to the transport (whether or not the send succeeded).
    fn on_served(&mut self) {}
}

/// One reading from a [`ColorSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    pub color: Rgb,
    /// Per-channel flag (red, green, blue): a press was registered
    /// while taking this sample.
    pub pressed: [bool; 3],
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Configuration rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
