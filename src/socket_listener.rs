//! Listening socket setup

use std::io::{Error as IoError, Result as IoResult};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::os::fd::{AsFd, BorrowedFd};

use crate::log;
use crate::SocketConfig;

/// Non-blocking [`TcpListener`] with the [`SocketConfig`] applied to every accepted stream
#[derive(Debug)]
pub(crate) struct Listener {
    inner: TcpListener,
    socket_config: SocketConfig,
}

impl Listener {
    /// Binds `addr` with `SO_REUSEADDR` and `SO_REUSEPORT` and starts listening.
    ///
    /// The listener is non-blocking: a worker woken for it may find the pending
    /// connection already gone.
    pub(crate) fn bind(
        addr: SocketAddr,
        backlog: i32,
        socket_config: &SocketConfig,
    ) -> IoResult<Self> {
        log::debug!("binding {addr} backlog {backlog}");

        let socket = socket2::Socket::new(
            socket2::Domain::for_address(addr),
            socket2::Type::STREAM,
            None,
        )
        .map_err(|err| context("socket creation", err))?;
        socket
            .set_reuse_address(true)
            .map_err(|err| context("SO_REUSEADDR", err))?;
        socket
            .set_reuse_port(true)
            .map_err(|err| context("SO_REUSEPORT", err))?;
        socket
            .bind(&addr.into())
            .map_err(|err| context(&format!("bind {addr}"), err))?;
        socket
            .listen(backlog)
            .map_err(|err| context("listen", err))?;
        socket.set_nonblocking(true)?;

        Ok(Self {
            inner: socket.into(),
            socket_config: socket_config.clone(),
        })
    }

    pub(crate) fn local_addr(&self) -> IoResult<SocketAddr> {
        self.inner.local_addr()
    }

    pub(crate) fn accept(&self) -> IoResult<(TcpStream, SocketAddr)> {
        self.inner.accept().map(|(stream, addr)| {
            if let Err(err) = SocketConfig::set_socket_cfg(&stream, &self.socket_config) {
                log::error!("socket config fail: {err:?}");
                let _ = err;
            }
            (stream, addr)
        })
    }
}

impl AsFd for Listener {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.inner.as_fd()
    }
}

fn context(step: &str, err: IoError) -> IoError {
    IoError::new(err.kind(), format!("{step} failed: {err}"))
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::net::{Ipv4Addr, TcpStream};
    use std::thread;
    use std::time::Duration;

    use super::*;

    fn any_port() -> SocketAddr {
        (Ipv4Addr::LOCALHOST, 0).into()
    }

    #[test]
    fn bind_and_accept_test() {
        let listener = Listener::bind(any_port(), 16, &SocketConfig::default()).unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        // nothing pending yet
        let err = listener.accept().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WouldBlock);

        let _client = TcpStream::connect(addr).unwrap();
        thread::sleep(Duration::from_millis(50));

        let (stream, _) = listener.accept().unwrap();
        assert!(stream.nodelay().unwrap());
    }

    #[test]
    fn reuse_port_test() {
        let first = Listener::bind(any_port(), 16, &SocketConfig::default()).unwrap();
        let addr = first.local_addr().unwrap();

        let second = Listener::bind(addr, 16, &SocketConfig::default());
        assert!(second.is_ok(), "{second:?}");
    }
}
