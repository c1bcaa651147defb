//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                   |
//! |------------|----------------|-------------------------------|
//! | `gpio`     | InputPin (HAL) | Linux sysfs GPIO              |
//! | `hardware` | ColorSource    | the three switches, via gpio  |
//! | `log_sink` | EventSink      | `log` facade / stderr         |
//! | `palette`  | ColorSource    | fixed colour cycle (no HW)    |
//! | `time`     | Clock          | `std::time::Instant`          |
//! | `udp`      | DatagramPort   | `std::net::UdpSocket`         |

pub mod gpio;
pub mod hardware;
pub mod log_sink;
pub mod palette;
pub mod time;
pub mod udp;
