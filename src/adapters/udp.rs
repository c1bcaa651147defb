//! UDP adapter.
//!
//! A blocking `std::net::UdpSocket` with a short read timeout: the
//! timeout is what lets the service loop get back to the switches while
//! nobody is asking for the colour.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use log::error;

use crate::app::ports::DatagramPort;
use crate::error::CommsError;

pub struct UdpEndpoint {
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl UdpEndpoint {
    /// Bind to `addr` and cap every receive at `poll_timeout`.
    pub fn bind<A: ToSocketAddrs>(addr: A, poll_timeout: Duration) -> Result<Self, CommsError> {
        let socket = UdpSocket::bind(addr).map_err(|e| {
            error!("UDP bind failed: {}", e);
            CommsError::BindFailed { port: 0 }
        })?;
        Self::from_socket(socket, poll_timeout)
    }

    /// Bind on all interfaces.
    pub fn bind_port(port: u16, poll_timeout: Duration) -> Result<Self, CommsError> {
        Self::bind(("0.0.0.0", port), poll_timeout).map_err(|e| match e {
            CommsError::BindFailed { .. } => CommsError::BindFailed { port },
            other => other,
        })
    }

    pub fn from_socket(socket: UdpSocket, poll_timeout: Duration) -> Result<Self, CommsError> {
        if poll_timeout.is_zero() {
            // Zero would mean "block forever" to the OS.
            return Err(CommsError::SocketConfigFailed);
        }
        let configured = socket
            .set_nonblocking(false)
            .and_then(|()| socket.set_read_timeout(Some(poll_timeout)))
            .and_then(|()| socket.local_addr());
        let local_addr = configured.map_err(|e| {
            error!("UDP socket setup failed: {}", e);
            CommsError::SocketConfigFailed
        })?;
        Ok(Self { socket, local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl DatagramPort for UdpEndpoint {
    fn recv_from(&mut self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>> {
        match self.socket.recv_from(buf) {
            Ok((len, from)) => Ok(Some((len, from))),
            // Unix reports an expired read timeout as WouldBlock, Windows as TimedOut.
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn send_to(&mut self, data: &[u8], addr: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(data, addr)
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        Some(self.local_addr)
    }
}
