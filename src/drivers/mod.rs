//! Switch drivers: debounced edge detection and the per-channel button model.

pub mod button;
pub mod edge;
