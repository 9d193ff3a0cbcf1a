use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::common::limits;
use crate::SocketConfig;

/// Represents the config parameters required to create a server.
///
/// # Example
///
/// ```
/// # use brick::ServerConfig;
/// let cfg = ServerConfig { worker_thread_nr: 4, ..ServerConfig::default() };
/// ```
///
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, all IPv4 interfaces by default
    pub ip: IpAddr,

    /// Number of worker threads waiting for readiness events.
    /// Defaults to the host parallelism, a value of `0` is treated as `1`.
    pub worker_thread_nr: usize,

    /// Ceiling of pending, not yet accepted connections
    pub backlog: i32,

    /// A request has to fit into one read of this size, the rest is cut off
    pub max_request_size: usize,

    /// Timeout of each readiness wait.
    /// Bounds how long an idle worker needs to notice a shutdown.
    pub wait_timeout: Duration,

    /// Number of readiness events a worker takes per wait
    pub events_per_wait: usize,

    /// Per connection socket configuration.
    /// See [`SocketConfig`]
    pub socket_config: SocketConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            worker_thread_nr: num_cpus::get(),
            backlog: limits::BACKLOG_DEFAULT,
            max_request_size: limits::MAX_REQUEST_SIZE_DEFAULT,
            wait_timeout: limits::WAIT_TIMEOUT_DEFAULT,
            events_per_wait: limits::EVENTS_PER_WAIT_DEFAULT,
            socket_config: SocketConfig::default(),
        }
    }
}
