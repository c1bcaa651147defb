//! Stepped decay model
//!
//! A press sets a channel to its ceiling; the value then falls back to
//! zero over `decay_ms`, passing through `steps` equal-width plateaus.
//! There is no timer: the value is computed on demand from the press
//! timestamp and the current time.
//!
//! ```text
//!  init ┤████████
//!       │        ████████                 init=255, steps=3, decay=30s
//!       │                ████████           0..10s  -> 255
//!     0 ┤                        ────────  10..20s  -> 170
//!       └──────┬───────┬───────┬───────    20..30s  ->  85
//!             10s     20s     30s          >= 30s   ->   0
//! ```
//!
//! All arithmetic is integer.  A sample exactly on a plateau boundary
//! belongs to the later (lower) plateau.

use crate::app::ports::ConfigError;

/// Shape of the decay: ceiling, duration and number of plateaus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayProfile {
    init_value: u8,
    decay_ms: u32,
    steps: u32,
}

impl DecayProfile {
    pub fn new(init_value: u8, decay_ms: u32, steps: u32) -> Result<Self, ConfigError> {
        if steps == 0 {
            return Err(ConfigError::ValidationFailed("steps must be >= 1"));
        }
        if decay_ms == 0 {
            return Err(ConfigError::ValidationFailed("decay_ms must be > 0"));
        }
        Ok(Self {
            init_value,
            decay_ms,
            steps,
        })
    }

    pub fn init_value(&self) -> u8 {
        self.init_value
    }

    pub fn decay_ms(&self) -> u32 {
        self.decay_ms
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Value `elapsed_ms` after a press.
    pub fn value_at(&self, elapsed_ms: u64) -> u8 {
        let decay = u64::from(self.decay_ms);
        if elapsed_ms >= decay {
            return 0;
        }
        let steps = u64::from(self.steps);
        // floor(elapsed / (decay / steps)) without leaving integers.
        let step = elapsed_ms * steps / decay;
        let remaining = steps - step;
        // floor(init * (1 - step / steps)); fits in u8 because remaining <= steps.
        (u64::from(self.init_value) * remaining / steps) as u8
    }
}

/// Fixed-capacity channel label.
pub type ChannelName = heapless::String<16>;

/// `name` cut to the first 16 bytes' worth of whole characters.
pub fn channel_name(name: &str) -> ChannelName {
    let mut n = ChannelName::new();
    for c in name.chars() {
        if n.push(c).is_err() {
            break;
        }
    }
    n
}

/// One colour component driven by button presses.
#[derive(Debug, Clone)]
pub struct DecayChannel {
    name: ChannelName,
    profile: DecayProfile,
    /// `None` until the first press: the channel starts dark.
    last_press_ms: Option<u64>,
}

impl DecayChannel {
    pub fn new(name: &str, profile: DecayProfile) -> Self {
        Self {
            name: channel_name(name),
            profile,
            last_press_ms: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile(&self) -> &DecayProfile {
        &self.profile
    }

    pub fn last_press_ms(&self) -> Option<u64> {
        self.last_press_ms
    }

    /// Register a press.  Restarts the decay from the ceiling regardless
    /// of where the previous one had got to.
    pub fn on_edge(&mut self, now_ms: u64) {
        log::info!("DecayChannel({}) triggered", self.name);
        self.last_press_ms = Some(now_ms);
    }

    /// Current value at `now_ms`.
    pub fn value(&self, now_ms: u64) -> u8 {
        match self.last_press_ms {
            // A clock that reads earlier than the press counts as "just pressed".
            Some(pressed) => self.profile.value_at(now_ms.saturating_sub(pressed)),
            None => 0,
        }
    }
}
