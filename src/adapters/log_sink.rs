//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via env_logger, which journald picks up when
//! the server runs as a systemd unit).

use log::{debug, error, info, warn};

use crate::app::events::{AppEvent, CHANNEL_NAMES};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { local_addr } => match local_addr {
                Some(addr) => info!("START | listening on {}", addr),
                None => info!("START"),
            },
            AppEvent::ButtonPressed { channel } => {
                let name = CHANNEL_NAMES.get(*channel).copied().unwrap_or("?");
                info!("PRESS | {}", name);
            }
            AppEvent::RequestReceived { from, request, len } => {
                debug!("RECV  | {:?} ({} bytes) from {}", request, len, from);
            }
            AppEvent::ReplySent { to, reply, bytes } => {
                debug!("SENT  | {} ({} bytes) to {}", reply, bytes, to);
            }
            AppEvent::SendFailed { to, kind } => {
                warn!("SEND  | reply to {} dropped: {}", to, kind);
            }
            AppEvent::Status { color, metrics } => {
                info!(
                    "RGB = {} | up={}s loops={} served={} bad={} send_fail={} presses={:?}",
                    color,
                    metrics.uptime_secs,
                    metrics.loop_iterations,
                    metrics.queries_served,
                    metrics.bad_requests,
                    metrics.send_failures,
                    metrics.presses,
                );
            }
            AppEvent::Fault { error } => {
                error!("Received {} fault: {}", error.class(), error);
            }
        }
    }
}
