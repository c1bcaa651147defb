//! Application core — the colour service and its port boundary.
//!
//! The service loop, the wire protocol and the events it emits live here.
//! All interaction with GPIO, sockets and the clock happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
