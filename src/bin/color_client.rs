//! Minimal client for poking a running colour source.
//!
//! ```text
//! color-client GET COLOR            -> received COLOR 240 0 80
//! color-client --server 10.0.0.5 x  -> received ERROR
//! ```
//!
//! The arguments are joined with single spaces and sent as one datagram;
//! the first reply is printed.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, warn};

use colorsource::Reply;

#[derive(Parser)]
#[command(name = "color-client")]
#[command(about = "Send one request to a colour source and print the reply")]
struct Args {
    #[arg(short, long, default_value = "color-source.local")]
    server: String,

    #[arg(short, long, default_value_t = colorsource::DEFAULT_PORT)]
    port: u16,

    #[arg(short, long, default_value_t = 2000, help = "How long to wait for the reply, in ms")]
    timeout_ms: u64,

    #[arg(long, default_value_t = 1024)]
    buf_size: usize,

    /// Words of the message, e.g. `GET COLOR`.
    words: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let message = args.words.join(" ");
    let server: SocketAddr = (args.server.as_str(), args.port)
        .to_socket_addrs()
        .with_context(|| format!("resolving {}", args.server))?
        .next()
        .with_context(|| format!("{} has no address", args.server))?;

    let local = if server.is_ipv4() {
        "0.0.0.0:0"
    } else {
        "[::]:0"
    };
    let socket = UdpSocket::bind(local).context("binding client socket")?;
    socket.set_read_timeout(Some(Duration::from_millis(args.timeout_ms.max(1))))?;

    debug!("sending {:?} to {}", message, server);
    socket
        .send_to(message.as_bytes(), server)
        .with_context(|| format!("sending to {}", server))?;

    let mut buf = vec![0u8; args.buf_size.max(1)];
    let (len, from) = match socket.recv_from(&mut buf) {
        Ok(r) => r,
        Err(e) if matches!(e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => {
            bail!("no reply from {} within {} ms", server, args.timeout_ms)
        }
        Err(e) => return Err(e).context("receiving reply"),
    };

    let payload = &buf[..len];
    if Reply::decode(payload).is_none() {
        warn!("reply from {} is not a valid COLOR/ERROR message", from);
    }
    println!("received {}", String::from_utf8_lossy(payload));
    Ok(())
}
