//! End-to-end tests of the service loop over mock hardware.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use colorsource::app::events::AppEvent;
use colorsource::app::ports::Pull;
use colorsource::app::service::ColorService;
use colorsource::control::decay::DecayChannel;
use colorsource::drivers::button::{ButtonBank, ButtonChannel};
use colorsource::drivers::edge::EdgeDetector;

use crate::mock_hw::{
    client, profile, switch_board, FakeClock, FakePin, FlakyPin, RecordingSink, ScriptedNet,
    Switches, DEBOUNCE_MS,
};

type Service = ColorService<ButtonBank<EdgeDetector<FakePin>>, FakeClock>;

struct Rig {
    service: Service,
    switches: Switches,
    clock: FakeClock,
    net: ScriptedNet,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let (bank, switches) = switch_board();
        let clock = FakeClock::default();
        let service = ColorService::new(bank, clock.clone(), 1024, Duration::from_secs(3));
        Self {
            service,
            switches,
            clock,
            net: ScriptedNet::default(),
            sink: RecordingSink::default(),
        }
    }

    fn poll(&mut self) {
        self.service.poll_once(&mut self.net, &mut self.sink).unwrap();
    }

    /// Hold `channel` down across two polls, one debounce window apart.
    /// Returns the time the press registered (the first poll).
    fn press(&mut self, channel: usize) -> u64 {
        let at = self.clock.0.get();
        self.switches.press(channel);
        self.poll();
        self.clock.advance(u64::from(DEBOUNCE_MS));
        self.poll();
        at
    }

    fn release(&mut self, channel: usize) {
        self.switches.release(channel);
        self.poll();
        self.clock.advance(u64::from(DEBOUNCE_MS));
        self.poll();
    }

    /// Poll on the idle cadence (every 100 ms from t=1000) while the red
    /// switch is held over `[down, up)`, then a little longer.
    fn tap_red(&mut self, down: u64, up: u64) {
        let mut t = 1_000;
        while t <= up + 200 {
            self.clock.set(t);
            if (down..up).contains(&t) {
                self.switches.press(0);
            } else {
                self.switches.release(0);
            }
            self.poll();
            t += 100;
        }
    }

    /// Send one request at the current time and return the reply text.
    fn query(&mut self, payload: &[u8]) -> String {
        self.net.push(payload, client());
        self.poll();
        self.net.last_reply().expect("no reply sent")
    }
}

#[test]
fn idle_switches_serve_black() {
    let mut rig = Rig::new();
    rig.clock.set(500);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 0 0");
}

#[test]
fn press_sets_channel_to_initial_value() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    rig.press(0);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 255 0 0");
    assert_eq!(rig.service.last_color().r, 255);
    assert_eq!(rig.sink.presses(), vec![0]);
    assert_eq!(rig.service.metrics().presses, [1, 0, 0]);
}

#[test]
fn held_press_decays_through_plateaus() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    let pressed_at = rig.press(1);

    rig.clock.set(pressed_at + 9_999);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 255 0");
    rig.clock.set(pressed_at + 10_000);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 170 0");
    rig.clock.set(pressed_at + 20_000);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 85 0");
    rig.clock.set(pressed_at + 30_000);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 0 0");
    rig.clock.set(pressed_at + 90_000);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 0 0");
}

#[test]
fn second_press_restarts_decay() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    let first = rig.press(2);
    rig.clock.set(first + 15_000);
    rig.release(2);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 0 170");

    rig.press(2);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 0 255");
    assert_eq!(rig.sink.presses(), vec![2, 2]);
}

#[test]
fn release_does_not_restart_decay() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    let pressed_at = rig.press(0);
    rig.clock.set(pressed_at + 25_000);
    rig.release(0);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 85 0 0");
    assert_eq!(rig.sink.presses(), vec![0]);
}

#[test]
fn channels_decay_independently() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    let red_at = rig.press(0);
    rig.clock.set(red_at + 10_000);
    rig.press(1);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 170 255 0");
}

#[test]
fn contact_bounce_is_one_press() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    for (t, down) in [(1_000, true), (1_030, false), (1_060, true), (1_090, false), (1_120, true)] {
        rig.clock.set(t);
        if down {
            rig.switches.press(0);
        } else {
            rig.switches.release(0);
        }
        rig.poll();
    }
    rig.clock.set(1_300);
    rig.poll();
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 255 0 0");
    assert_eq!(rig.sink.presses(), vec![0]);
}

#[test]
fn short_tap_between_idle_polls_registers() {
    // Down at 1110, up at 1260: only the poll at 1200 sees it.
    let mut rig = Rig::new();
    rig.tap_red(1_110, 1_260);
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 255 0 0");
    assert_eq!(rig.sink.presses(), vec![0]);
}

#[test]
fn taps_register_at_any_phase_of_the_loop() {
    for len in [100, 150, 200] {
        for phase in (0..100).step_by(10) {
            let mut rig = Rig::new();
            let down = 1_100 + phase;
            rig.tap_red(down, down + len);
            assert_eq!(
                rig.query(b"GET COLOR"),
                "COLOR 255 0 0",
                "{len} ms tap starting {phase} ms after a poll"
            );
            assert_eq!(rig.sink.presses(), vec![0]);
        }
    }
}

#[test]
fn repeated_queries_at_same_instant_agree() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    rig.press(0);
    rig.press(1);
    let first = rig.query(b"GET COLOR");
    let second = rig.query(b"GET COLOR");
    assert_eq!(first, second);
    assert_eq!(rig.service.metrics().queries_served, 2);
}

#[test]
fn malformed_requests_get_error() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    for payload in [&b""[..], b"GET COLOUR", b"get color", b"GET COLOR\n", b" GET COLOR"] {
        assert_eq!(rig.query(payload), "ERROR");
    }
    assert_eq!(rig.service.metrics().bad_requests, 5);
    assert_eq!(rig.service.metrics().queries_served, 0);
}

#[test]
fn replies_go_back_to_sender() {
    let mut rig = Rig::new();
    let other = "10.0.0.9:4000".parse().unwrap();
    rig.net.push(b"GET COLOR", client());
    rig.poll();
    rig.net.push(b"nope", other);
    rig.poll();
    assert_eq!(rig.net.sent[0].1, client());
    assert_eq!(rig.net.sent[1].1, other);
}

#[test]
fn idle_loop_emits_status_every_interval() {
    let mut rig = Rig::new();
    for _ in 0..100 {
        rig.clock.advance(100);
        rig.poll();
    }
    assert!(rig.net.sent.is_empty());
    assert_eq!(rig.sink.status_count(), 3);
    assert_eq!(rig.service.metrics().loop_iterations, 100);

    let uptimes: Vec<u64> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Status { metrics, .. } => Some(metrics.uptime_secs),
            _ => None,
        })
        .collect();
    assert_eq!(uptimes, vec![3, 6, 9]);
}

#[test]
fn status_reports_current_colour() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    rig.press(0);
    rig.clock.set(5_000);
    rig.poll();
    let colour = rig.sink.events.iter().rev().find_map(|e| match e {
        AppEvent::Status { color, .. } => Some(*color),
        _ => None,
    });
    assert_eq!(colour.map(|c| (c.r, c.g, c.b)), Some((255, 0, 0)));
}

#[test]
fn send_failure_does_not_stop_service() {
    let mut rig = Rig::new();
    rig.clock.set(1_000);
    rig.net.fail_sends = true;
    rig.net.push(b"GET COLOR", client());
    rig.poll();
    assert!(rig.net.sent.is_empty());
    assert_eq!(rig.service.metrics().send_failures, 1);
    assert!(rig
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::SendFailed { .. })));

    rig.net.fail_sends = false;
    assert_eq!(rig.query(b"GET COLOR"), "COLOR 0 0 0");
}

#[test]
fn hardware_fault_ends_run_with_hardware_class() {
    let level = Rc::new(Cell::new(true));
    let broken = Rc::new(Cell::new(false));
    let channel = |name: &str| {
        let pin = FlakyPin {
            level: level.clone(),
            broken: broken.clone(),
        };
        ButtonChannel::new(
            EdgeDetector::new(pin, DEBOUNCE_MS),
            Pull::Up,
            DecayChannel::new(name, profile()),
        )
        .unwrap()
    };
    let bank = ButtonBank::new(channel("red"), channel("green"), channel("blue"));
    let clock = FakeClock::default();
    let mut service = ColorService::new(bank, clock, 1024, Duration::from_secs(3));

    let mut net = ScriptedNet::default();
    let mut sink = RecordingSink::default();
    service.poll_once(&mut net, &mut sink).unwrap();

    broken.set(true);
    let fault = service.run(&mut net, &mut sink).unwrap_err();
    assert_eq!(fault.class(), "hardware");
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::Fault { error }) if *error == fault
    ));
}
