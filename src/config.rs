//! System configuration parameters
//!
//! All tunable parameters for the colour source.  Defaults match the
//! deployed switch board; the server binary overrides individual values
//! from the command line.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, Pull};
use crate::control::decay::{ChannelName, DecayChannel, DecayProfile, channel_name};
use crate::pins;

/// Well-known UDP port the server listens on.
pub const DEFAULT_PORT: u16 = 9099;

/// Per-switch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Label used in log messages.
    pub name: ChannelName,
    /// BOARD header pin the switch is wired to.
    pub board_pin: u8,
    /// Bias direction; also decides which level means "pressed".
    pub pull: Pull,
    /// Value immediately after a press.
    pub init_value: u8,
    /// Milliseconds until the value is back to 0.
    pub decay_ms: u32,
    /// Number of plateaus on the way down.
    pub steps: u32,
}

impl ChannelConfig {
    /// Names longer than 16 bytes are truncated.
    pub fn new(name: &str, board_pin: u8) -> Self {
        Self {
            name: channel_name(name),
            board_pin,
            pull: Pull::Up,
            init_value: 240,
            decay_ms: 30_000,
            steps: 3,
        }
    }

    pub fn profile(&self) -> Result<DecayProfile, ConfigError> {
        DecayProfile::new(self.init_value, self.decay_ms, self.steps)
    }

    /// Build the decay model for this switch.
    pub fn decay_channel(&self) -> Result<DecayChannel, ConfigError> {
        Ok(DecayChannel::new(&self.name, self.profile()?))
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Network ---
    /// UDP port, bound on all interfaces.
    pub port: u16,
    /// Receive buffer; longer datagrams are truncated.
    pub recv_buffer_bytes: usize,
    /// Longest a single receive may block (milliseconds).  Bounds how
    /// stale the switch state can get between samples.
    pub poll_timeout_ms: u64,

    // --- Diagnostics ---
    /// Interval between status log lines (seconds).
    pub status_interval_secs: u64,

    // --- GPIO ---
    /// Debounce window for the switches (milliseconds).
    pub debounce_ms: u32,
    /// Root of the sysfs GPIO tree.
    pub gpio_root: PathBuf,
    /// Red, green, blue, in reply order.
    pub channels: [ChannelConfig; 3],
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Network
            port: DEFAULT_PORT,
            recv_buffer_bytes: 1024,
            poll_timeout_ms: 100,

            // Diagnostics
            status_interval_secs: 3,

            // GPIO
            debounce_ms: 100,
            gpio_root: PathBuf::from("/sys/class/gpio"),
            channels: [
                ChannelConfig::new("red", pins::RED_BOARD_PIN),
                ChannelConfig::new("green", pins::GREEN_BOARD_PIN),
                ChannelConfig::new("blue", pins::BLUE_BOARD_PIN),
            ],
        }
    }
}

impl SystemConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recv_buffer_bytes == 0 {
            return Err(ConfigError::ValidationFailed(
                "recv_buffer_bytes must be > 0",
            ));
        }
        // A zero read timeout means "block forever" to the socket layer.
        if self.poll_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_timeout_ms must be > 0"));
        }
        for ch in &self.channels {
            ch.profile()?;
            if pins::board_to_bcm(ch.board_pin).is_none() {
                return Err(ConfigError::ValidationFailed(
                    "board_pin must be a GPIO header pin",
                ));
            }
        }
        let [r, g, b] = &self.channels;
        if r.board_pin == g.board_pin || g.board_pin == b.board_pin || r.board_pin == b.board_pin {
            return Err(ConfigError::ValidationFailed(
                "each channel needs its own pin",
            ));
        }
        Ok(())
    }
}
