//! Client side of the request/reply exchange

use super::framing::{read_frame, write_frame};
use crate::error::{Error, Result};
use std::io::{self, ErrorKind};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

/// Sending half of a strict request/reply exchange.
///
/// `request` takes `&mut self` and blocks until the reply arrives, so a
/// second request can never be outstanding.
pub trait RequestTransport {
    /// Send one request and wait for exactly one reply
    fn request(&mut self, payload: &[u8]) -> Result<Vec<u8>>;
}

/// TCP connection in the request role
///
/// Any failed exchange closes the connection. A reply that arrives after a
/// timeout would otherwise be read as the answer to the next request, so
/// every later `request` fails with `NotConnected` and the caller has to
/// reconnect.
pub struct RequestSocket {
    stream: Option<TcpStream>,
    addr: SocketAddr,
}

impl RequestSocket {
    /// Connect to a server. `timeout` bounds connect, reads and writes;
    /// `None` blocks indefinitely.
    pub fn connect(addr: SocketAddr, timeout: Option<Duration>) -> Result<Self> {
        let stream = match timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        }
        .map_err(Error::Transport)?;

        stream.set_read_timeout(timeout).map_err(Error::Transport)?;
        stream.set_write_timeout(timeout).map_err(Error::Transport)?;
        if let Err(e) = stream.set_nodelay(true) {
            log::warn!("Failed to set TCP_NODELAY: {}", e);
        }

        log::info!("Connected to tcp://{}", addr);
        Ok(Self {
            stream: Some(stream),
            addr,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// False once an exchange has failed and the connection was closed
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

impl RequestTransport for RequestSocket {
    fn request(&mut self, payload: &[u8]) -> Result<Vec<u8>> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(Error::Transport(io::Error::new(
                ErrorKind::NotConnected,
                "connection closed after an earlier failed request",
            )));
        };

        let result = write_frame(stream, payload).and_then(|_| read_frame(stream));
        if let Err(e) = &result {
            log::warn!("Closing connection to {}: {}", self.addr, e);
            let _ = stream.shutdown(Shutdown::Both);
            self.stream = None;
        }
        result
    }
}
