//! Hardware adapter — wires the real switches into a [`ColorSource`].
//!
//! Claims the three GPIO lines named in the configuration, puts a
//! software debouncer on each and binds them to their decay models.
//! This is the only place the service touches the sysfs tree.
//!
//! [`ColorSource`]: crate::app::ports::ColorSource

use crate::config::SystemConfig;
use crate::drivers::button::{ButtonBank, ButtonChannel};
use crate::drivers::edge::EdgeDetector;
use crate::error::{Error, HardwareError};
use crate::pins;

use super::gpio::{SysfsGpio, SysfsPin};

/// The production switch bank.
pub type SwitchBank = ButtonBank<EdgeDetector<SysfsPin>>;

/// Claim and configure all three switches.
///
/// If a later channel fails, the pins already claimed are released as
/// they drop.
pub fn open_switches(config: &SystemConfig) -> Result<SwitchBank, Error> {
    config.validate()?;
    let gpio = SysfsGpio::new(&config.gpio_root);

    let open = |index: usize| -> Result<ButtonChannel<EdgeDetector<SysfsPin>>, Error> {
        let ch = &config.channels[index];
        let bcm = pins::board_to_bcm(ch.board_pin).ok_or(HardwareError::NotAGpio {
            board_pin: ch.board_pin,
        })?;
        let pin = gpio.input(bcm, ch.pull)?;
        let input = EdgeDetector::new(pin, config.debounce_ms);
        Ok(ButtonChannel::new(input, ch.pull, ch.decay_channel()?)?)
    };

    Ok(ButtonBank::new(open(0)?, open(1)?, open(2)?))
}
