//! Software edge detection with debounce over any embedded-hal input pin.
//!
//! ## Behaviour
//!
//! Each [`poll_edge`](EdgeInput::poll_edge) samples the pin.  The first
//! sample that differs from the last stable level becomes the new stable
//! level and latches the sticky edge flag straight away.  For the next
//! `debounce_ms` the line is left alone: contact bounce, and a release
//! inside that window, produce no further edges.  Reading the flag clears
//! it.
//!
//! ```text
//!  level  ‾‾‾‾‾|_|‾|________________|‾|_|‾‾‾‾‾‾‾‾
//!  edge         ^ latched            ^ latched
//!               |<- debounce ->|     |<- debounce ->|
//! ```
//!
//! A tap is seen as long as at least one sample lands inside it, so with
//! one sample per loop iteration any tap longer than the loop's receive
//! timeout registers, whatever its phase.
//!
//! Both directions latch the flag; deciding whether a transition was a
//! press is the caller's job (it knows the wiring).

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::app::ports::{EdgeInput, Pull};
use crate::error::HardwareError;

impl From<Infallible> for HardwareError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

pub struct EdgeDetector<P> {
    pin: P,
    debounce_ms: u32,
    pull: Option<Pull>,
    stable_high: bool,
    last_edge_ms: Option<u64>,
    edge_pending: bool,
}

impl<P> EdgeDetector<P>
where
    P: InputPin,
    P::Error: Into<HardwareError>,
{
    pub fn new(pin: P, debounce_ms: u32) -> Self {
        Self {
            pin,
            debounce_ms,
            pull: None,
            stable_high: false,
            last_edge_ms: None,
            edge_pending: false,
        }
    }

    /// Bias direction recorded by the last [`configure`](EdgeInput::configure).
    pub fn pull(&self) -> Option<Pull> {
        self.pull
    }

    /// Last debounced level.
    pub fn stable_high(&self) -> bool {
        self.stable_high
    }

    fn sample(&mut self) -> Result<bool, HardwareError> {
        self.pin.is_high().map_err(Into::into)
    }
}

impl<P> EdgeInput for EdgeDetector<P>
where
    P: InputPin,
    P::Error: Into<HardwareError>,
{
    fn configure(&mut self, pull: Pull) -> Result<(), HardwareError> {
        self.pull = Some(pull);
        self.stable_high = self.sample()?;
        self.last_edge_ms = None;
        self.edge_pending = false;
        Ok(())
    }

    fn poll_edge(&mut self, now_ms: u64) -> Result<bool, HardwareError> {
        let high = self.sample()?;

        let settling = self
            .last_edge_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < u64::from(self.debounce_ms));
        if high != self.stable_high && !settling {
            self.stable_high = high;
            self.last_edge_ms = Some(now_ms);
            self.edge_pending = true;
        }

        Ok(core::mem::take(&mut self.edge_pending))
    }

    fn read_level(&mut self) -> Result<bool, HardwareError> {
        Ok(self.stable_high)
    }
}
