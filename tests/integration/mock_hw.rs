//! Mock adapters for integration tests.
//!
//! Fake pins and a hand-driven clock stand in for the GPIO header; a
//! scripted datagram port records every reply so tests can assert on the
//! full exchange without opening sockets.

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::rc::Rc;

use colorsource::app::events::AppEvent;
use colorsource::app::ports::{Clock, DatagramPort, EventSink, Pull};
use colorsource::control::decay::{DecayChannel, DecayProfile};
use colorsource::drivers::button::{ButtonBank, ButtonChannel};
use colorsource::drivers::edge::EdgeDetector;
use colorsource::error::HardwareError;
use embedded_hal::digital::{ErrorType, InputPin};

// ── FakePin ───────────────────────────────────────────────────

/// Input pin whose level is shared with the test body.
#[derive(Clone)]
pub struct FakePin(pub Rc<Cell<bool>>);

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

/// Input pin that fails once `broken` is set.
#[derive(Clone)]
pub struct FlakyPin {
    pub level: Rc<Cell<bool>>,
    pub broken: Rc<Cell<bool>>,
}

impl ErrorType for FlakyPin {
    type Error = HardwareError;
}

impl InputPin for FlakyPin {
    fn is_high(&mut self) -> Result<bool, HardwareError> {
        if self.broken.get() {
            Err(HardwareError::ReadFailed { pin: 24 })
        } else {
            Ok(self.level.get())
        }
    }

    fn is_low(&mut self) -> Result<bool, HardwareError> {
        self.is_high().map(|h| !h)
    }
}

// ── Switch board ──────────────────────────────────────────────

pub const DEBOUNCE_MS: u32 = 100;

/// Three pull-up switches, all released.  Setting a level to `false`
/// presses the switch.
pub struct Switches {
    pub levels: [Rc<Cell<bool>>; 3],
}

#[allow(dead_code)]
impl Switches {
    pub fn press(&self, channel: usize) {
        self.levels[channel].set(false);
    }

    pub fn release(&self, channel: usize) {
        self.levels[channel].set(true);
    }
}

pub fn profile() -> DecayProfile {
    DecayProfile::new(255, 30_000, 3).unwrap()
}

pub fn switch_board() -> (ButtonBank<EdgeDetector<FakePin>>, Switches) {
    let levels = [
        Rc::new(Cell::new(true)),
        Rc::new(Cell::new(true)),
        Rc::new(Cell::new(true)),
    ];
    let channel = |i: usize, name: &str| {
        let input = EdgeDetector::new(FakePin(levels[i].clone()), DEBOUNCE_MS);
        ButtonChannel::new(input, Pull::Up, DecayChannel::new(name, profile())).unwrap()
    };
    let bank = ButtonBank::new(channel(0, "red"), channel(1, "green"), channel(2, "blue"));
    (bank, Switches { levels })
}

// ── FakeClock ─────────────────────────────────────────────────

/// Clock that only moves when the test says so.
#[derive(Clone, Default)]
pub struct FakeClock(pub Rc<Cell<u64>>);

#[allow(dead_code)]
impl FakeClock {
    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── ScriptedNet ───────────────────────────────────────────────

/// Datagram port fed from a queue.  An empty queue behaves like an
/// expired receive timeout.
#[derive(Default)]
pub struct ScriptedNet {
    pub inbox: VecDeque<(Vec<u8>, SocketAddr)>,
    pub sent: Vec<(Vec<u8>, SocketAddr)>,
    pub fail_sends: bool,
}

#[allow(dead_code)]
impl ScriptedNet {
    pub fn push(&mut self, payload: &[u8], from: SocketAddr) {
        self.inbox.push_back((payload.to_vec(), from));
    }

    pub fn replies(&self) -> Vec<String> {
        self.sent
            .iter()
            .map(|(data, _)| String::from_utf8_lossy(data).into_owned())
            .collect()
    }

    pub fn last_reply(&self) -> Option<String> {
        self.replies().pop()
    }
}

impl DatagramPort for ScriptedNet {
    fn recv_from(&mut self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>> {
        Ok(self.inbox.pop_front().map(|(data, from)| {
            let n = data.len().min(buf.len());
            buf[..n].copy_from_slice(&data[..n]);
            (n, from)
        }))
    }

    fn send_to(&mut self, data: &[u8], addr: SocketAddr) -> io::Result<usize> {
        if self.fail_sends {
            return Err(io::Error::new(io::ErrorKind::AddrNotAvailable, "destination unreachable"));
        }
        self.sent.push((data.to_vec(), addr));
        Ok(data.len())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn status_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Status { .. }))
            .count()
    }

    pub fn presses(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ButtonPressed { channel } => Some(*channel),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

pub fn client() -> SocketAddr {
    "192.168.1.50:51000".parse().unwrap()
}
