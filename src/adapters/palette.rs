//! Hardware-free colour source.
//!
//! Cycles through a fixed list of colours, moving to the next one every
//! time a `GET COLOR` is answered.  Useful for exercising clients on a
//! machine without the switch board.

use crate::app::commands::Rgb;
use crate::app::ports::{ColorSource, Sample};
use crate::error::HardwareError;

/// The colours served by `--source palette`, in order.
pub const DEFAULT_PALETTE: [Rgb; 6] = [
    Rgb::new(192, 133, 19),
    Rgb::new(181, 18, 27),
    Rgb::new(76, 91, 105),
    Rgb::new(182, 151, 93),
    Rgb::new(0, 120, 255),
    Rgb::new(20, 20, 20),
];

pub struct Palette {
    colors: Vec<Rgb>,
    next: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.to_vec())
    }
}

impl Palette {
    /// An empty list serves black.
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors, next: 0 }
    }

    /// The colour the next `GET COLOR` will receive.
    pub fn current(&self) -> Rgb {
        self.colors.get(self.next).copied().unwrap_or_default()
    }
}

impl ColorSource for Palette {
    fn sample(&mut self, _now_ms: u64) -> Result<Sample, HardwareError> {
        Ok(Sample {
            color: self.current(),
            pressed: [false; 3],
        })
    }

    fn on_served(&mut self) {
        if !self.colors.is_empty() {
            self.next = (self.next + 1) % self.colors.len();
        }
    }
}
