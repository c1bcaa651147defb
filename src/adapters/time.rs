//! Monotonic time adapter.
//!
//! Wraps `std::time::Instant`, so presses decay on a clock that never
//! jumps when NTP or an operator adjusts the wall clock.

use std::time::Instant;

use crate::app::ports::Clock;

/// Milliseconds since the adapter was created.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
