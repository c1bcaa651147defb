//! Unified error types for the colour source.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level loop's error handling uniform. Subsystem variants are `Copy`
//! so they travel through the service without allocation; the underlying
//! OS error text is logged at the point of failure.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the service funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO input could not be set up or read. Always fatal.
    Hardware(HardwareError),
    /// The network socket failed in a way the loop cannot absorb.
    Comms(CommsError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Short fault class, logged on the way out of the process.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Hardware(_) => "hardware",
            Self::Comms(_) => "comms",
            Self::Config(_) => "config",
        }
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// The pin could not be exported to user space.
    ExportFailed { pin: u8 },
    /// The pin direction could not be set to input.
    ConfigureFailed { pin: u8 },
    /// Reading the pin level failed.
    ReadFailed { pin: u8 },
    /// The pin value file held something other than `0` or `1`.
    BadLevel { pin: u8 },
    /// The BOARD header pin is not a GPIO.
    NotAGpio { board_pin: u8 },
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExportFailed { pin } => write!(f, "GPIO{pin} export failed"),
            Self::ConfigureFailed { pin } => write!(f, "GPIO{pin} configure failed"),
            Self::ReadFailed { pin } => write!(f, "GPIO{pin} read failed"),
            Self::BadLevel { pin } => write!(f, "GPIO{pin} returned an invalid level"),
            Self::NotAGpio { board_pin } => write!(f, "header pin {board_pin} is not a GPIO"),
        }
    }
}

impl std::error::Error for HardwareError {}

impl embedded_hal::digital::Error for HardwareError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The listening socket could not be bound.
    BindFailed { port: u16 },
    /// The receive timeout could not be applied.
    SocketConfigFailed,
    /// Receive failed with something other than a timeout.
    ReceiveFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed { port } => write!(f, "bind to UDP port {port} failed"),
            Self::SocketConfigFailed => write!(f, "socket configuration failed"),
            Self::ReceiveFailed => write!(f, "receive failed"),
        }
    }
}

impl std::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
