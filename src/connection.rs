//! Accepted client connection

use std::io::{Read, Result as IoResult, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use nix::sys::epoll::Epoll;

use crate::log;
use crate::util::Registration;
use crate::Response;

/// A client stream between accept and close.
///
/// Holds a [`Registration`] so the number of open connections can be read at any time.
#[derive(Debug)]
pub(crate) struct Connection {
    peer_addr: SocketAddr,
    stream: TcpStream,
    _registration: Registration,
}

impl Connection {
    pub(crate) fn new(stream: TcpStream, peer_addr: SocketAddr, registration: Registration) -> Self {
        Self {
            peer_addr,
            stream,
            _registration: registration,
        }
    }

    #[inline]
    pub(crate) fn stream(&self) -> &TcpStream {
        &self.stream
    }

    #[inline]
    pub(crate) fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Reads once into a buffer of `max_size` bytes.
    ///
    /// Bytes beyond `max_size` stay unread. `None` if the peer closed without sending.
    pub(crate) fn read_request(&mut self, max_size: usize) -> IoResult<Option<Vec<u8>>> {
        let mut buf = vec![0; max_size];
        let size = self.stream.read(&mut buf)?;
        if size == 0 {
            return Ok(None);
        }
        buf.truncate(size);
        Ok(Some(buf))
    }

    pub(crate) fn respond(&mut self, response: &Response) -> IoResult<()> {
        self.stream.write_all(&response.serialize())?;
        self.stream.flush()
    }

    /// Deregisters from `epoll` and shuts the stream down.
    pub(crate) fn close(self, epoll: &Epoll) {
        if let Err(err) = epoll.delete(&self.stream) {
            // never registered or already gone
            log::debug!("deregister [{}]: {err}", self.peer_addr);
            let _ = err;
        }
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            log::debug!("shutdown [{}]: {err}", self.peer_addr);
            let _ = err;
        }
        log::debug!("closed connection [{}]", self.peer_addr);
    }
}
