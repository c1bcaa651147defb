//! Integration tests for the colour service.
//!
//! The service loop runs against mock switches, a hand-driven clock and a
//! scripted datagram port; see [`mock_hw`].

mod mock_hw;
mod service_tests;
