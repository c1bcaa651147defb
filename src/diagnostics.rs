//! Runtime diagnostics.
//!
//! Counters kept by the service loop, the throttle that paces the
//! periodic status line, and a panic hook that gets the panic message
//! into the log before the process unwinds (unwinding drops the GPIO
//! claims, so the pins are released either way).

use std::time::Duration;

/// Runtime counters, reported with every status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeMetrics {
    pub uptime_secs: u64,
    /// Completed loop iterations.
    pub loop_iterations: u64,
    /// `GET COLOR` requests answered.
    pub queries_served: u64,
    /// Datagrams answered with `ERROR`.
    pub bad_requests: u64,
    /// Replies that could not be sent.
    pub send_failures: u64,
    /// Registered presses, per channel (red, green, blue).
    pub presses: [u64; 3],
}

impl RuntimeMetrics {
    pub fn total_presses(&self) -> u64 {
        self.presses.iter().sum()
    }
}

/// Fires at most once per interval, measured on the caller's clock.
#[derive(Debug, Clone, Copy)]
pub struct StatusTimer {
    interval_ms: u64,
    last_ms: u64,
}

impl StatusTimer {
    pub fn new(interval: Duration, now_ms: u64) -> Self {
        Self {
            interval_ms: interval.as_millis() as u64,
            last_ms: now_ms,
        }
    }

    /// `true` if more than one interval has passed since the last time
    /// this returned `true` (or since construction).
    pub fn due(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_ms) > self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// Install a panic hook that logs the panic message.
///
/// Call once during init, after the logger is up.
pub fn install_panic_handler() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        match info.location() {
            Some(loc) => log::error!("PANIC at {}:{}: {}", loc.file(), loc.line(), reason),
            None => log::error!("PANIC: {}", reason),
        }
        default_hook(info);
    }));
}
