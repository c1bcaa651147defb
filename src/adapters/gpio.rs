//! Linux sysfs GPIO adapter.
//!
//! Exposes `/sys/class/gpio/gpioN/value` as an embedded-hal [`InputPin`].
//! Edge detection and debounce happen in software on top
//! ([`EdgeDetector`](crate::drivers::edge::EdgeDetector)); this module
//! only claims the line, reads it and gives it back.
//!
//! ## Bias
//!
//! sysfs cannot configure pull resistors.  The requested [`Pull`] is
//! logged and used by the button driver to interpret levels; the bias
//! itself must come from the board firmware config
//! (e.g. `gpio=23,24,25=ip,pu` in `config.txt`).
//!
//! ## Release
//!
//! Every pin exported here is unexported again when its [`SysfsPin`] is
//! dropped, including while a panic unwinds out of the service loop.  A
//! pin that was already exported when we claimed it (by another tool, or
//! by the board's boot config) is left exported.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::digital::{ErrorType, InputPin};
use log::{debug, error, info, warn};

use crate::app::ports::Pull;
use crate::error::HardwareError;

/// How long to wait for udev to create and chmod a freshly exported pin.
const EXPORT_SETTLE: Duration = Duration::from_millis(1_000);
const EXPORT_POLL: Duration = Duration::from_millis(10);

/// Factory for pins under one sysfs GPIO root.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Claim BCM line `bcm` as an input.
    pub fn input(&self, bcm: u8, pull: Pull) -> Result<SysfsPin, HardwareError> {
        let dir = self.root.join(format!("gpio{bcm}"));

        let owns_export = !dir.exists();
        if owns_export {
            append(&self.root.join("export"), bcm).map_err(|e| {
                error!("GPIO{} export: {}", bcm, e);
                HardwareError::ExportFailed { pin: bcm }
            })?;
        }

        let deadline = Instant::now() + EXPORT_SETTLE;
        while !dir.exists() {
            if Instant::now() >= deadline {
                error!("GPIO{} export: {} never appeared", bcm, dir.display());
                return Err(HardwareError::ExportFailed { pin: bcm });
            }
            thread::sleep(EXPORT_POLL);
        }

        // From here on a failure still unexports a pin we exported.
        let mut pin = SysfsPin {
            bcm,
            value_path: dir.join("value"),
            unexport_path: self.root.join("unexport"),
            owns_export,
        };

        // udev may not have fixed the permissions on a fresh export yet.
        let direction = dir.join("direction");
        loop {
            match fs::write(&direction, "in") {
                Ok(()) => break,
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied && Instant::now() < deadline => {
                    thread::sleep(EXPORT_POLL);
                }
                Err(e) => {
                    error!("GPIO{} direction: {}", bcm, e);
                    pin.release();
                    return Err(HardwareError::ConfigureFailed { pin: bcm });
                }
            }
        }

        info!(
            "GPIO{} claimed as input (pull-{:?} expected from board config{})",
            bcm,
            pull,
            if owns_export { "" } else { ", already exported" }
        );
        Ok(pin)
    }
}

/// One exported input line.
#[derive(Debug)]
pub struct SysfsPin {
    bcm: u8,
    value_path: PathBuf,
    unexport_path: PathBuf,
    owns_export: bool,
}

impl SysfsPin {
    pub fn bcm(&self) -> u8 {
        self.bcm
    }

    /// `true` while this pin is exported by us and still to be unexported.
    pub fn owns_export(&self) -> bool {
        self.owns_export
    }

    /// Hand the line back to the kernel if we exported it.  Safe to call
    /// more than once.
    pub fn release(&mut self) {
        if !self.owns_export {
            return;
        }
        self.owns_export = false;
        match append(&self.unexport_path, self.bcm) {
            Ok(()) => debug!("GPIO{} released", self.bcm),
            Err(e) => warn!("GPIO{} unexport: {}", self.bcm, e),
        }
    }

    fn read(&self) -> Result<bool, HardwareError> {
        let raw = fs::read_to_string(&self.value_path).map_err(|e| {
            error!("GPIO{} read: {}", self.bcm, e);
            HardwareError::ReadFailed { pin: self.bcm }
        })?;
        match raw.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => {
                error!("GPIO{} read: unexpected value {:?}", self.bcm, other);
                Err(HardwareError::BadLevel { pin: self.bcm })
            }
        }
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        self.release();
    }
}

impl ErrorType for SysfsPin {
    type Error = HardwareError;
}

impl InputPin for SysfsPin {
    fn is_high(&mut self) -> Result<bool, HardwareError> {
        self.read()
    }

    fn is_low(&mut self) -> Result<bool, HardwareError> {
        self.read().map(|high| !high)
    }
}

fn append(path: &Path, bcm: u8) -> io::Result<()> {
    let mut f = OpenOptions::new().append(true).open(path)?;
    writeln!(f, "{bcm}")
}
