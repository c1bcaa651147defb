//! ColorSource library.
//!
//! Three momentary switches (red, green, blue) become a decaying RGB
//! colour, served over UDP to anyone who sends `GET COLOR`.  Exposes the
//! pure-logic modules for integration testing; the Linux-specific pieces
//! live behind the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pins;

pub mod adapters;
pub mod control;
pub mod drivers;

pub use app::commands::{Reply, Request, Rgb};
pub use config::DEFAULT_PORT;
