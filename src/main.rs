//! ColorSource server — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SysfsGpio + EdgeDetector   UdpEndpoint   MonotonicClock     │
//! │  (switches, or Palette)     (Datagram)    (Clock)            │
//! │  LogEventSink (EventSink)                                    │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │           ColorService (single-threaded loop)          │  │
//! │  │  sample switches · answer GET COLOR · status lines     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop only ends on a fault.  The fault is logged with its class,
//! the GPIO lines are released, and the process exits non-zero.  Faults
//! during setup (bad config, bind, claiming the GPIOs) are logged the
//! same way.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use colorsource::adapters::hardware::{SwitchBank, open_switches};
use colorsource::adapters::log_sink::LogEventSink;
use colorsource::adapters::palette::Palette;
use colorsource::adapters::time::MonotonicClock;
use colorsource::adapters::udp::UdpEndpoint;
use colorsource::app::events::AppEvent;
use colorsource::app::ports::{ColorSource, EventSink, Pull};
use colorsource::app::service::ColorService;
use colorsource::config::SystemConfig;
use colorsource::diagnostics;
use colorsource::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// The three switches on the GPIO header.
    Buttons,
    /// A fixed colour cycle; needs no hardware.
    Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PullArg {
    Up,
    Down,
}

impl From<PullArg> for Pull {
    fn from(p: PullArg) -> Self {
        match p {
            PullArg::Up => Pull::Up,
            PullArg::Down => Pull::Down,
        }
    }
}

#[derive(Parser)]
#[command(name = "color-source")]
#[command(about = "Serve the colour set by three push buttons over UDP")]
#[command(version)]
struct Args {
    #[arg(short, long, default_value_t = colorsource::DEFAULT_PORT)]
    port: u16,

    #[arg(long, value_enum, default_value_t = SourceKind::Buttons)]
    source: SourceKind,

    #[arg(long, help = "Longest a receive may block, in ms")]
    poll_ms: Option<u64>,

    #[arg(long, help = "Seconds between status log lines")]
    status_secs: Option<u64>,

    #[arg(long, help = "Switch debounce window, in ms")]
    debounce_ms: Option<u32>,

    #[arg(long, help = "Value right after a press (all channels)")]
    init_value: Option<u8>,

    #[arg(long, help = "Time until a press has fully decayed, in ms (all channels)")]
    decay_ms: Option<u32>,

    #[arg(long, help = "Number of decay plateaus (all channels)")]
    steps: Option<u32>,

    #[arg(long, value_enum, help = "How the switches are biased (all channels)")]
    pull: Option<PullArg>,

    #[arg(long, help = "sysfs GPIO root")]
    gpio_root: Option<PathBuf>,

    #[arg(long, help = "Print the effective configuration as JSON and exit")]
    print_config: bool,
}

impl Args {
    fn config(&self) -> Result<SystemConfig, Error> {
        let mut c = SystemConfig {
            port: self.port,
            ..Default::default()
        };
        if let Some(ms) = self.poll_ms {
            c.poll_timeout_ms = ms;
        }
        if let Some(secs) = self.status_secs {
            c.status_interval_secs = secs;
        }
        if let Some(ms) = self.debounce_ms {
            c.debounce_ms = ms;
        }
        if let Some(root) = &self.gpio_root {
            c.gpio_root.clone_from(root);
        }
        for ch in &mut c.channels {
            if let Some(v) = self.init_value {
                ch.init_value = v;
            }
            if let Some(ms) = self.decay_ms {
                ch.decay_ms = ms;
            }
            if let Some(n) = self.steps {
                ch.steps = n;
            }
            if let Some(p) = self.pull {
                ch.pull = p.into();
            }
        }
        c.validate()?;
        Ok(c)
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    diagnostics::install_panic_handler();

    let mut sink = LogEventSink::new();
    let config = report(args.config(), &mut sink).context("invalid configuration")?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    info!("ColorSource v{} starting up...", env!("CARGO_PKG_VERSION"));

    let bound = UdpEndpoint::bind_port(config.port, config.poll_timeout()).map_err(Error::from);
    let mut net = report(bound, &mut sink).context("binding UDP socket")?;

    let fault = match args.source {
        SourceKind::Buttons => {
            let switches = claim_switches(&config, &mut sink).context("claiming switch GPIOs")?;
            serve(switches, &config, &mut net, &mut sink)
        }
        SourceKind::Palette => serve(Palette::default(), &config, &mut net, &mut sink),
    };

    info!("Exiting...");
    Err(anyhow::Error::new(fault).context("service loop ended"))
}

/// Pass `result` through, emitting a setup failure as a fault event.
fn report<T>(result: Result<T, Error>, sink: &mut impl EventSink) -> Result<T, Error> {
    result.inspect_err(|error| sink.emit(&AppEvent::Fault { error: *error }))
}

fn claim_switches(config: &SystemConfig, sink: &mut impl EventSink) -> Result<SwitchBank, Error> {
    report(open_switches(config), sink)
}

/// Run the loop until it faults, then release the source's hardware.
fn serve<S: ColorSource>(
    source: S,
    config: &SystemConfig,
    net: &mut UdpEndpoint,
    sink: &mut LogEventSink,
) -> Error {
    let mut service = ColorService::new(
        source,
        MonotonicClock::new(),
        config.recv_buffer_bytes,
        config.status_interval(),
    );

    // The service has already emitted the fault.
    let fault = match service.run(net, sink) {
        Ok(never) => match never {},
        Err(e) => e,
    };

    // Dropping the source hands any GPIO lines back to the kernel.
    drop(service.into_source());
    info!("Hardware released");
    fault
}
