//! Momentary-switch driver: edge input + decay model per colour channel.
//!
//! ## Hardware
//!
//! Three momentary switches (red, green, blue), each on its own GPIO
//! with a pull resistor.  The [`EdgeInput`] underneath reports debounced
//! transitions as a sticky flag that must be drained promptly, otherwise
//! later presses are lost.
//!
//! ## Press detection
//!
//! | Edge pending | Switch reads pressed | Result                 |
//! |--------------|----------------------|------------------------|
//! | no           | -                    | nothing                |
//! | yes          | no                   | release, ignored       |
//! | yes          | yes                  | press, decay restarted |

use log::debug;

use crate::app::commands::Rgb;
use crate::app::ports::{ColorSource, EdgeInput, Pull, Sample};
use crate::control::decay::DecayChannel;
use crate::error::HardwareError;

pub struct ButtonChannel<E> {
    input: E,
    pull: Pull,
    channel: DecayChannel,
}

impl<E: EdgeInput> ButtonChannel<E> {
    /// Configure `input` with `pull` and bind it to `channel`.
    pub fn new(mut input: E, pull: Pull, channel: DecayChannel) -> Result<Self, HardwareError> {
        input.configure(pull)?;
        Ok(Self {
            input,
            pull,
            channel,
        })
    }

    pub fn channel(&self) -> &DecayChannel {
        &self.channel
    }

    pub fn input_mut(&mut self) -> &mut E {
        &mut self.input
    }

    /// Debounced switch state: `true` if pressed.
    pub fn is_pressed(&mut self) -> Result<bool, HardwareError> {
        Ok(self.pull.is_pressed(self.input.read_level()?))
    }

    /// Drain the edge flag; restart the decay if it was a press.
    /// Returns `true` when a press was registered.
    pub fn check(&mut self, now_ms: u64) -> Result<bool, HardwareError> {
        if !self.input.poll_edge(now_ms)? {
            return Ok(false);
        }
        if self.is_pressed()? {
            self.channel.on_edge(now_ms);
            Ok(true)
        } else {
            debug!("{}: release edge ignored", self.channel.name());
            Ok(false)
        }
    }

    /// Current value, draining any pending edge first.
    pub fn value(&mut self, now_ms: u64) -> Result<u8, HardwareError> {
        self.check(now_ms)?;
        Ok(self.channel.value(now_ms))
    }
}

/// The fixed red, green, blue triple of switches.
///
/// Owns the inputs: dropping the bank releases whatever hardware claims
/// they hold.
pub struct ButtonBank<E> {
    channels: [ButtonChannel<E>; 3],
}

impl<E: EdgeInput> ButtonBank<E> {
    pub fn new(red: ButtonChannel<E>, green: ButtonChannel<E>, blue: ButtonChannel<E>) -> Self {
        Self {
            channels: [red, green, blue],
        }
    }

    pub fn channels(&self) -> &[ButtonChannel<E>; 3] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [ButtonChannel<E>; 3] {
        &mut self.channels
    }
}

impl<E: EdgeInput> ColorSource for ButtonBank<E> {
    fn sample(&mut self, now_ms: u64) -> Result<Sample, HardwareError> {
        let mut values = [0u8; 3];
        let mut pressed = [false; 3];
        for (i, ch) in self.channels.iter_mut().enumerate() {
            pressed[i] = ch.check(now_ms)?;
            values[i] = ch.channel.value(now_ms);
        }
        Ok(Sample {
            color: Rgb::from(values),
            pressed,
        })
    }
}
