//! Server side of the request/reply exchange
//!
//! # Connection Lifecycle
//!
//! ```text
//! 1. Client connects to the TCP port
//! 2. try_recv() accepts it (non-blocking) and starts buffering its bytes
//! 3. One complete frame is handed out as a request; a reply is now owed
//! 4. send() writes the reply; the socket is ready for the next request
//! 5. On EOF or reset the connection is dropped and the next client accepted
//! ```
//!
//! Only one client is served at a time. Later connections wait in the
//! listen backlog until the current client goes away.

use super::framing::{frame_ready, take_frame, write_frame};
use crate::error::{Error, Result};
use std::io::{ErrorKind, Read};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

/// Receiving half of a strict request/reply exchange
pub trait ReplyTransport: Send {
    /// Return the next request if one is ready, without blocking
    fn try_recv(&mut self) -> Result<Option<Vec<u8>>>;

    /// Send the reply for the request returned by the last `try_recv`
    fn send(&mut self, reply: &[u8]) -> Result<()>;
}

/// Scratch read size per `read` call
const READ_CHUNK: usize = 256;

struct Peer {
    stream: TcpStream,
    addr: SocketAddr,
    inbox: Vec<u8>,
    awaiting_reply: bool,
}

/// TCP listener in the reply role
pub struct ReplySocket {
    listener: TcpListener,
    peer: Option<Peer>,
}

impl ReplySocket {
    /// Bind the listening endpoint
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let listener = TcpListener::bind(addr).map_err(Error::Transport)?;
        listener.set_nonblocking(true).map_err(Error::Transport)?;
        Ok(Self {
            listener,
            peer: None,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(Error::Transport)
    }

    /// Address of the connected client, if any
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer.as_ref().map(|peer| peer.addr)
    }

    fn accept(&mut self) -> Result<bool> {
        match self.listener.accept() {
            Ok((stream, addr)) => {
                stream.set_nonblocking(true).map_err(Error::Transport)?;
                if let Err(e) = stream.set_nodelay(true) {
                    log::warn!("Failed to set TCP_NODELAY for {}: {}", addr, e);
                }
                log::info!("Client connected: {}", addr);
                self.peer = Some(Peer {
                    stream,
                    addr,
                    inbox: Vec::new(),
                    awaiting_reply: false,
                });
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(Error::Transport(e)),
        }
    }

    #[cfg(test)]
    fn buffered(&self) -> usize {
        self.peer.as_ref().map_or(0, |peer| peer.inbox.len())
    }

    fn disconnect(&mut self, reason: &str) {
        if let Some(peer) = self.peer.take() {
            let _ = peer.stream.shutdown(std::net::Shutdown::Both);
            log::info!("Client disconnected: {} ({})", peer.addr, reason);
        }
    }
}

impl Peer {
    /// Read until the inbox holds the next frame or the socket runs dry.
    /// Returns false on EOF. Pipelined bytes past that frame stay in the
    /// kernel buffer.
    fn fill_inbox(&mut self) -> std::io::Result<bool> {
        let mut chunk = [0u8; READ_CHUNK];
        while !frame_ready(&self.inbox) {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Ok(false),
                Ok(n) => self.inbox.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(true),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }
}

impl ReplyTransport for ReplySocket {
    fn try_recv(&mut self) -> Result<Option<Vec<u8>>> {
        if self.peer.as_ref().is_some_and(|peer| peer.awaiting_reply) {
            return Err(Error::Protocol(
                "Receive attempted while a reply is still owed".to_string(),
            ));
        }

        if self.peer.is_none() && !self.accept()? {
            return Ok(None);
        }
        let Some(peer) = self.peer.as_mut() else {
            return Ok(None);
        };

        let open = match peer.fill_inbox() {
            Ok(open) => open,
            Err(e) => {
                log::warn!("Read from {} failed: {}", peer.addr, e);
                self.disconnect("read error");
                return Ok(None);
            }
        };

        match take_frame(&mut peer.inbox) {
            Ok(Some(frame)) => {
                peer.awaiting_reply = true;
                log::debug!("Received {} byte request from {}", frame.len(), peer.addr);
                Ok(Some(frame))
            }
            Ok(None) => {
                if !open {
                    self.disconnect("end of stream");
                }
                Ok(None)
            }
            Err(e) => {
                log::error!("Dropping client {}: {}", peer.addr, e);
                self.disconnect("oversized frame");
                Ok(None)
            }
        }
    }

    fn send(&mut self, reply: &[u8]) -> Result<()> {
        let peer = match self.peer.as_mut() {
            Some(peer) if peer.awaiting_reply => peer,
            _ => {
                return Err(Error::Protocol(
                    "Reply sent without a pending request".to_string(),
                ))
            }
        };

        // Block for the write; replies are tiny and must not be split by WouldBlock
        let result = peer
            .stream
            .set_nonblocking(false)
            .map_err(Error::Transport)
            .and_then(|_| write_frame(&mut peer.stream, reply))
            .and_then(|_| peer.stream.set_nonblocking(true).map_err(Error::Transport));
        peer.awaiting_reply = false;

        if let Err(e) = result {
            self.disconnect("write error");
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::framing::read_frame;
    use std::io::Write;
    use std::time::{Duration, Instant};

    fn recv_within(socket: &mut ReplySocket, timeout: Duration) -> Option<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(frame) = socket.try_recv().unwrap() {
                return Some(frame);
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        None
    }

    #[test]
    fn test_no_client_is_idle() {
        let mut socket = ReplySocket::bind("127.0.0.1:0").unwrap();
        assert_eq!(socket.try_recv().unwrap(), None);
        assert_eq!(socket.peer_addr(), None);
    }

    #[test]
    fn test_request_then_reply() {
        let mut socket = ReplySocket::bind("127.0.0.1:0").unwrap();
        let mut client = TcpStream::connect(socket.local_addr().unwrap()).unwrap();

        client.write_all(&[0, 0, 0, 2, 0x08, 0x02]).unwrap();
        let frame = recv_within(&mut socket, Duration::from_secs(2)).unwrap();
        assert_eq!(frame, vec![0x08, 0x02]);

        socket.send(b"1").unwrap();
        assert_eq!(read_frame(&mut client).unwrap(), b"1");
    }

    #[test]
    fn test_alternation_enforced() {
        let mut socket = ReplySocket::bind("127.0.0.1:0").unwrap();
        assert!(matches!(socket.send(b"1"), Err(Error::Protocol(_))));

        let mut client = TcpStream::connect(socket.local_addr().unwrap()).unwrap();
        client.write_all(&[0, 0, 0, 1, 0xaa]).unwrap();
        recv_within(&mut socket, Duration::from_secs(2)).unwrap();
        assert!(matches!(socket.try_recv(), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_disconnect_accepts_next_client() {
        let mut socket = ReplySocket::bind("127.0.0.1:0").unwrap();
        let addr = socket.local_addr().unwrap();

        let first = TcpStream::connect(addr).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while socket.peer_addr().is_none() && Instant::now() < deadline {
            socket.try_recv().unwrap();
        }
        assert!(socket.peer_addr().is_some());
        drop(first);

        let mut second = TcpStream::connect(addr).unwrap();
        second.write_all(&[0, 0, 0, 1, 0x01]).unwrap();
        let frame = recv_within(&mut socket, Duration::from_secs(2)).unwrap();
        assert_eq!(frame, vec![0x01]);
        assert_eq!(socket.peer_addr(), Some(second.local_addr().unwrap()));
    }

    #[test]
    fn test_pipelined_frames_are_buffered_one_at_a_time() {
        let mut socket = ReplySocket::bind("127.0.0.1:0").unwrap();
        let addr = socket.local_addr().unwrap();

        let big = vec![0x5a; 64 * 1024];
        let mut wire = vec![0, 0, 0, 2, 0x08, 0x02];
        wire.extend_from_slice(&(big.len() as u32).to_be_bytes());
        wire.extend_from_slice(&big);
        let writer = std::thread::spawn(move || {
            let mut client = TcpStream::connect(addr).unwrap();
            client.write_all(&wire).unwrap();
            client
        });

        let frame = recv_within(&mut socket, Duration::from_secs(2)).unwrap();
        assert_eq!(frame, vec![0x08, 0x02]);
        assert!(socket.buffered() < READ_CHUNK);

        socket.send(b"1").unwrap();
        let frame = recv_within(&mut socket, Duration::from_secs(2)).unwrap();
        assert_eq!(frame, big);
        assert_eq!(socket.buffered(), 0);

        let mut client = writer.join().unwrap();
        assert_eq!(read_frame(&mut client).unwrap(), b"1");
    }
}
