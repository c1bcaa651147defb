//! Signal models driven by the control loop.

pub mod decay;
