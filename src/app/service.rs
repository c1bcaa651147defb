//! Application service — the hexagonal core.
//!
//! [`ColorService`] owns the colour source, the clock and the loop
//! bookkeeping.  The network port and the event sink are injected at call
//! sites, so the whole loop runs against mock adapters in tests.
//!
//! ```text
//!  ColorSource ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │      ColorService       │
//!  DatagramPort ◀─▶│ sample · serve · status │
//!                  └────────────────────────┘
//! ```
//!
//! One iteration: sample the source (draining switch edges), wait up to
//! the poll timeout for a datagram, answer it, and emit a status line if
//! one is due.  The receive wait is the only place the loop blocks.

use std::convert::Infallible;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use log::{error, warn};

use crate::diagnostics::{RuntimeMetrics, StatusTimer};
use crate::error::{CommsError, Result};

use super::commands::{Reply, Request, Rgb};
use super::events::AppEvent;
use super::ports::{Clock, ColorSource, DatagramPort, EventSink};

// ───────────────────────────────────────────────────────────────
// ColorService
// ───────────────────────────────────────────────────────────────

pub struct ColorService<S, C> {
    source: S,
    clock: C,
    recv_buf: Vec<u8>,
    status: StatusTimer,
    metrics: RuntimeMetrics,
    last_color: Rgb,
    started_ms: u64,
}

impl<S: ColorSource, C: Clock> ColorService<S, C> {
    /// `recv_buffer_bytes` caps the accepted datagram size;
    /// `status_interval` paces the periodic status event.
    pub fn new(source: S, clock: C, recv_buffer_bytes: usize, status_interval: Duration) -> Self {
        let now = clock.now_ms();
        Self {
            source,
            clock,
            recv_buf: vec![0; recv_buffer_bytes.max(1)],
            status: StatusTimer::new(status_interval, now),
            metrics: RuntimeMetrics::default(),
            last_color: Rgb::default(),
            started_ms: now,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run until a fatal fault.  Only hardware faults and unrecoverable
    /// socket errors come back out; the fault is emitted as
    /// [`AppEvent::Fault`] first.
    pub fn run(
        &mut self,
        net: &mut impl DatagramPort,
        sink: &mut impl EventSink,
    ) -> Result<Infallible> {
        sink.emit(&AppEvent::Started {
            local_addr: net.local_addr(),
        });
        loop {
            if let Err(error) = self.poll_once(net, sink) {
                sink.emit(&AppEvent::Fault { error });
                return Err(error);
            }
        }
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One pass of the loop: sample → bounded receive → reply → status.
    pub fn poll_once(
        &mut self,
        net: &mut impl DatagramPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        // 1. Sample the source; this also drains pending switch edges.
        let sample = self.source.sample(self.clock.now_ms())?;
        for (channel, _) in sample.pressed.iter().enumerate().filter(|(_, p)| **p) {
            self.metrics.presses[channel] += 1;
            sink.emit(&AppEvent::ButtonPressed { channel });
        }
        self.last_color = sample.color;

        // 2. Wait (bounded) for one request.
        match net.recv_from(&mut self.recv_buf) {
            Ok(Some((len, from))) => {
                let len = len.min(self.recv_buf.len());
                let request = Request::decode(&self.recv_buf[..len]);
                sink.emit(&AppEvent::RequestReceived { from, request, len });
                self.answer(request, from, net, sink);
            }
            Ok(None) => {}
            // ICMP errors from an earlier reply can surface on the next
            // receive on some platforms; they concern that reply, not us.
            Err(e) if is_transient(e.kind()) => {
                warn!("receive: {} (ignored)", e);
            }
            Err(e) => {
                error!("receive failed: {}", e);
                return Err(CommsError::ReceiveFailed.into());
            }
        }

        // 3. Periodic status.
        let now = self.clock.now_ms();
        if self.status.due(now) {
            self.metrics.uptime_secs = now.saturating_sub(self.started_ms) / 1000;
            sink.emit(&AppEvent::Status {
                color: self.last_color,
                metrics: self.metrics,
            });
        }

        self.metrics.loop_iterations += 1;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Colour sampled at the start of the most recent iteration.
    pub fn last_color(&self) -> Rgb {
        self.last_color
    }

    pub fn metrics(&self) -> &RuntimeMetrics {
        &self.metrics
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Give up the service, handing back the source (and with it any
    /// hardware it holds).
    pub fn into_source(self) -> S {
        self.source
    }

    // ── Internal ──────────────────────────────────────────────

    fn answer(
        &mut self,
        request: Request,
        to: SocketAddr,
        net: &mut impl DatagramPort,
        sink: &mut impl EventSink,
    ) {
        let reply = match request {
            Request::GetColor => Reply::Color(self.last_color),
            Request::Invalid => {
                self.metrics.bad_requests += 1;
                Reply::Error
            }
        };

        let text = reply.encode();
        match net.send_to(text.as_bytes(), to) {
            Ok(bytes) => sink.emit(&AppEvent::ReplySent { to, reply, bytes }),
            Err(e) => {
                self.metrics.send_failures += 1;
                sink.emit(&AppEvent::SendFailed { to, kind: e.kind() });
            }
        }

        if request == Request::GetColor {
            self.metrics.queries_served += 1;
            self.source.on_served();
        }
    }
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset | ErrorKind::Interrupted
    )
}
