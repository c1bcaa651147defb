//! Outbound application events.
//!
//! The [`ColorService`](super::service::ColorService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to stderr/journald, count them
//! in a test, etc.

use std::net::SocketAddr;

use crate::diagnostics::RuntimeMetrics;
use crate::error::Error;

use super::commands::{Reply, Request, Rgb};

/// Channel labels in reply order.
pub const CHANNEL_NAMES: [&str; 3] = ["red", "green", "blue"];

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service entered its loop.
    Started { local_addr: Option<SocketAddr> },

    /// A press was registered on a channel (index into [`CHANNEL_NAMES`]).
    ButtonPressed { channel: usize },

    /// A datagram arrived.
    RequestReceived {
        from: SocketAddr,
        request: Request,
        len: usize,
    },

    /// A reply went out.
    ReplySent {
        to: SocketAddr,
        reply: Reply,
        bytes: usize,
    },

    /// A reply could not be sent; it is dropped, not retried.
    SendFailed { to: SocketAddr, kind: std::io::ErrorKind },

    /// Periodic status line.
    Status { color: Rgb, metrics: RuntimeMetrics },

    /// A fatal fault, during setup or out of the loop.
    Fault { error: Error },
}
