//! [`Server`] in its [`state::Created`] and [`state::Listening`] states

use std::fmt;
use std::io::{Error as IoError, ErrorKind as IoErrorKind, Result as IoResult};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

use crate::common::Method;
use crate::event_loop::EventLoop;
use crate::log;
use crate::router::{Handler, Router};
use crate::server_config::ServerConfig;
use crate::socket_listener::Listener;

/// Implementation of the `brick` `Server`.
///
/// Routes are added in the [`Created`](state::Created) state. [`Server::listen`] binds the
/// socket and moves to [`Listening`](state::Listening), from where [`Server::serve`] runs the
/// worker threads until the process receives `SIGINT`/`SIGTERM` or
/// [`ShutdownHandle::shutdown`] is called.
///
/// # Example
///
/// ```no_run
/// use brick::{Request, Response, Server};
///
/// # fn main() -> std::io::Result<()> {
/// let mut server = Server::new();
/// let _ = server
///     .route("/", "GET", |_rq: &Request| Response::from_string("Hello, World!"))
///     .route("/mirror", "POST", |rq: &Request| {
///         Response::from_string(rq.body_str().unwrap_or_default())
///     });
///
/// server.listen(3000)?.serve()
/// # }
/// ```
#[allow(missing_debug_implementations)]
pub struct Server<S: State = state::Created> {
    config: ServerConfig,
    state: S,
}

impl Server<state::Created> {
    /// Server with the default [`ServerConfig`], one worker per available CPU
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Server with the given [`ServerConfig`]
    #[must_use]
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            config,
            state: state::Created {
                router: Router::new(),
            },
        }
    }

    /// Registers `handler` for requests with exactly `method` and `path`.
    ///
    /// A later registration of the same pair replaces the earlier one.
    pub fn route<P, M, H>(&mut self, path: P, method: M, handler: H) -> &mut Self
    where
        P: Into<String>,
        M: Into<Method>,
        H: Handler + 'static,
    {
        self.state.router.register(method, path, handler);
        self
    }

    /// The routes registered so far
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.state.router
    }

    /// Binds the configured ip and `port`, creates the readiness facility and
    /// installs the `SIGINT`/`SIGTERM` watcher.
    ///
    /// Port `0` lets the OS pick one, see [`Server::local_addr`].
    ///
    /// # Errors
    ///
    /// `std::io::Error` if socket creation, bind, listen, epoll setup or signal
    /// registration fails
    ///
    pub fn listen(self, port: u16) -> IoResult<Server<state::Listening>> {
        let addr = SocketAddr::new(self.config.ip, port);
        let listener = Listener::bind(addr, self.config.backlog, &self.config.socket_config)?;
        let local_addr = listener.local_addr()?;

        let state::Created { router } = self.state;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("routes: {router:?}");
        }

        let event_loop = EventLoop::new(listener, router, &self.config)?;
        let signals = Signals::new([SIGINT, SIGTERM])?;

        log::info!("listening on {local_addr}");

        Ok(Server {
            config: self.config,
            state: state::Listening {
                event_loop: Arc::new(event_loop),
                local_addr,
                signals,
            },
        })
    }

    /// [`Server::listen`] and [`Server::serve`] in one call.
    ///
    /// Blocks until shutdown. A setup failure is logged, printed to stderr and
    /// ends the process with exit status `1`.
    pub fn start(self, port: u16) {
        if let Err(err) = self.listen(port).and_then(|server| server.serve()) {
            log::error!("server setup failed: {err}");
            eprintln!("brick: failed to start server on port {port}: {err}");
            std::process::exit(1);
        }
    }
}

impl Default for Server<state::Created> {
    fn default() -> Self {
        Self::new()
    }
}

impl Server<state::Listening> {
    /// The bound address, with the real port if `0` was requested
    #[must_use]
    #[inline]
    pub fn local_addr(&self) -> SocketAddr {
        self.state.local_addr
    }

    /// Returns the number of clients currently connected to the server.
    #[must_use]
    pub fn num_connections(&self) -> usize {
        self.state.event_loop.num_connections().load(Ordering::Acquire)
    }

    /// A handle to stop [`Server::serve`] from another thread
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            handle: self.state.signals.handle(),
            num_connections: self.state.event_loop.num_connections(),
        }
    }

    /// Runs the worker threads and blocks until shutdown.
    ///
    /// On shutdown no further connections are accepted. The workers finish the
    /// connection in hand, exit with their next wait timeout and are joined.
    /// Accepted connections nobody served yet are closed without a response.
    ///
    /// # Errors
    ///
    /// `std::io::Error` if not a single worker thread could be spawned
    ///
    pub fn serve(self) -> IoResult<()> {
        let state::Listening {
            event_loop,
            local_addr,
            mut signals,
        } = self.state;

        let worker_thread_nr = self.config.worker_thread_nr.max(1);
        let mut workers = Vec::with_capacity(worker_thread_nr);
        for nr in 0..worker_thread_nr {
            let event_loop = Arc::clone(&event_loop);
            match thread::Builder::new()
                .name(format!("brick-worker-{nr}"))
                .spawn(move || event_loop.run())
            {
                Ok(jh) => workers.push(jh),
                Err(err) => {
                    log::error!("failed to spawn worker thread {nr}: {err}");
                    let _ = err;
                }
            }
        }

        if workers.is_empty() {
            event_loop.stop();
            return Err(IoError::new(
                IoErrorKind::Other,
                "no worker thread could be spawned",
            ));
        }

        log::info!("serving on {local_addr} with {} workers", workers.len());
        let _ = local_addr;

        match signals.forever().next() {
            Some(signal) => {
                log::info!("received signal {signal}, shutting down");
                let _ = signal;
            }
            None => {
                log::info!("shutdown requested");
            }
        }

        event_loop.stop();
        for worker in workers {
            if worker.join().is_err() {
                log::error!("worker thread panicked");
            }
        }
        event_loop.close_pending();

        log::info!("server stopped");
        Ok(())
    }
}

/// Stops a [`Server::serve`] running in another thread.
///
/// Cloneable and usable before `serve` is entered, `serve` then returns right
/// after spawning the workers.
#[derive(Clone)]
pub struct ShutdownHandle {
    handle: Handle,
    num_connections: Arc<AtomicUsize>,
}

impl ShutdownHandle {
    /// Same effect as `SIGINT` to the process, without the signal
    pub fn shutdown(&self) {
        self.handle.close();
    }

    /// `true` after [`ShutdownHandle::shutdown`]
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.handle.is_closed()
    }

    /// Returns the number of clients currently connected to the server.
    #[must_use]
    pub fn num_connections(&self) -> usize {
        self.num_connections.load(Ordering::Acquire)
    }
}

impl fmt::Debug for ShutdownHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownHandle")
            .field("is_shutdown", &self.is_shutdown())
            .field("num_connections", &self.num_connections())
            .finish()
    }
}

/// States of [`Server`] implement this trait
pub trait State {}

/// Available [`Server`](super::Server) [`States`](super::State)
pub mod state {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use signal_hook::iterator::Signals;

    use crate::event_loop::EventLoop;
    use crate::router::Router;

    /// Accepting route registrations, nothing bound yet
    #[derive(Debug)]
    pub struct Created {
        pub(crate) router: Router,
    }
    impl super::State for Created {}

    /// Bound and registered, ready to [`serve`](crate::Server::serve)
    #[allow(missing_debug_implementations)]
    pub struct Listening {
        pub(crate) event_loop: Arc<EventLoop>,
        pub(crate) local_addr: SocketAddr,
        pub(crate) signals: Signals,
    }
    impl super::State for Listening {}
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use super::*;
    use crate::{Request, Response};

    fn config() -> ServerConfig {
        ServerConfig {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            worker_thread_nr: 2,
            wait_timeout: Duration::from_millis(50),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn route_chaining_test() {
        let mut server = Server::new();
        let _ = server
            .route("/", "GET", |_: &Request| Response::from_string("a"))
            .route("/", "POST", |_: &Request| Response::from_string("b"))
            .route("/", "GET", |_: &Request| Response::from_string("c"));

        assert_eq!(server.router().len(), 2);
    }

    #[test]
    fn listen_on_any_port_test() {
        let server = Server::with_config(config()).listen(0).unwrap();
        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(server.num_connections(), 0);
    }

    #[test]
    fn listen_on_foreign_ip_test() {
        // TEST-NET-1, not an address of this host
        let server = Server::with_config(ServerConfig {
            ip: IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)),
            ..config()
        })
        .listen(0);
        assert!(server.is_err());
    }

    #[test]
    fn shutdown_before_serve_test() {
        let server = Server::with_config(config()).listen(0).unwrap();
        let handle = server.shutdown_handle();
        assert!(!handle.is_shutdown());

        handle.shutdown();
        assert!(handle.is_shutdown());
        server.serve().unwrap();
    }
}
