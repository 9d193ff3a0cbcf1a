use std::net::TcpStream;
use std::time::Duration;

/// Config for accepted client sockets
///
/// # Defaults
///
/// `no_delay`: true
/// `read_timeout`: disabled
/// `write_timeout`: disabled
///
/// Without timeouts a client that connects and never sends anything keeps a
/// worker thread busy until it disconnects. Set `read_timeout` to bound that.
///
#[derive(Clone, Debug)]
pub struct SocketConfig {
    /// `TCP_NODELAY`
    pub no_delay: bool,
    /// `read_timeout` accuracy is with possible __sub__-seconds, zero disables it
    pub read_timeout: Duration,
    /// `write_timeout` accuracy is with possible __sub__-seconds, zero disables it
    pub write_timeout: Duration,
}

impl SocketConfig {
    #[inline]
    pub(crate) fn set_socket_cfg(
        socket: &TcpStream,
        config: &SocketConfig,
    ) -> Result<(), std::io::Error> {
        // accepted sockets are handled with blocking reads and writes
        socket.set_nonblocking(false)?;
        socket.set_nodelay(config.no_delay)?;
        if !config.read_timeout.is_zero() {
            socket.set_read_timeout(Some(config.read_timeout))?;
        }
        if !config.write_timeout.is_zero() {
            socket.set_write_timeout(Some(config.write_timeout))?;
        }
        Ok(())
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            no_delay: true,
            read_timeout: Duration::ZERO,
            write_timeout: Duration::ZERO,
        }
    }
}
