//! Readiness loop shared by all worker threads
//!
//! Every worker blocks on the same epoll instance. The listener and each connection
//! are registered one-shot, so a readiness event wakes exactly one worker and the
//! descriptor stays disarmed until that worker is done with it.

use std::io::{ErrorKind as IoErrorKind, Result as IoResult};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use dashmap::DashMap;
use nix::errno::Errno;
use nix::sys::epoll::{Epoll, EpollCreateFlags, EpollEvent, EpollFlags};

use crate::connection::Connection;
use crate::log;
use crate::router::call_handler;
use crate::socket_listener::Listener;
use crate::util::Registration;
use crate::{Request, Response, Router, ServerConfig};

/// Token of the listening socket, connections count up from 1
const LISTENER_TOKEN: u64 = 0;

#[inline]
fn interest() -> EpollFlags {
    EpollFlags::EPOLLIN | EpollFlags::EPOLLONESHOT
}

pub(crate) struct EventLoop {
    /// Accepted connections waiting for their first readiness event
    connections: DashMap<u64, Connection>,
    epoll: Epoll,
    events_per_wait: usize,
    listener: Listener,
    max_request_size: usize,
    next_token: AtomicU64,
    num_connections: Arc<AtomicUsize>,
    router: Router,
    serving: AtomicBool,
    wait_timeout_ms: u16,
}

impl EventLoop {
    /// Creates the epoll instance and arms `listener` in it.
    pub(crate) fn new(listener: Listener, router: Router, config: &ServerConfig) -> IoResult<Self> {
        let epoll = Epoll::new(EpollCreateFlags::EPOLL_CLOEXEC)?;
        epoll.add(&listener, EpollEvent::new(interest(), LISTENER_TOKEN))?;

        Ok(Self {
            connections: DashMap::new(),
            epoll,
            events_per_wait: config.events_per_wait.max(1),
            listener,
            max_request_size: config.max_request_size,
            next_token: AtomicU64::new(LISTENER_TOKEN + 1),
            num_connections: Arc::new(AtomicUsize::default()),
            router,
            serving: AtomicBool::new(true),
            wait_timeout_ms: u16::try_from(config.wait_timeout.as_millis()).unwrap_or(u16::MAX),
        })
    }

    #[cfg(test)]
    pub(crate) fn local_addr(&self) -> IoResult<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared counter of open connections
    pub(crate) fn num_connections(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.num_connections)
    }

    #[inline]
    pub(crate) fn is_serving(&self) -> bool {
        self.serving.load(Ordering::Acquire)
    }

    /// Workers finish the connection in hand and leave their loop with the next wait.
    pub(crate) fn stop(&self) {
        self.serving.store(false, Ordering::Release);
    }

    /// Worker thread body, returns after [`EventLoop::stop`]
    pub(crate) fn run(&self) {
        let id = format!("{:?}", thread::current().id());
        log::debug!("running worker [{id}]");

        let mut events = vec![EpollEvent::empty(); self.events_per_wait];
        while self.is_serving() {
            let ready = match self.epoll.wait(&mut events, self.wait_timeout_ms) {
                Ok(ready) => ready,
                Err(Errno::EINTR) => continue,
                Err(err) => {
                    log::error!("worker [{id}] readiness wait failed: {err}");
                    let _ = err;
                    break;
                }
            };

            for event in &events[..ready] {
                match event.data() {
                    LISTENER_TOKEN => self.accept_connection(),
                    token => self.handle_connection(token),
                }
            }
        }

        log::debug!("terminating worker [{id}]");
        let _ = id;
    }

    fn accept_connection(&self) {
        if !self.is_serving() {
            // listener stays disarmed
            return;
        }

        let accepted = self.listener.accept();
        self.rearm_listener();

        match accepted {
            Ok((stream, peer_addr)) => self.register(stream, peer_addr),
            // taken by a concurrent accept or aborted by the client
            Err(err) if err.kind() == IoErrorKind::WouldBlock => {}
            Err(err) => {
                log::error!("error on connection accept: {err:?}");
                let _ = err;
            }
        }
    }

    fn rearm_listener(&self) {
        let mut event = EpollEvent::new(interest(), LISTENER_TOKEN);
        if let Err(err) = self.epoll.modify(&self.listener, &mut event) {
            log::error!("failed to rearm listener: {err}");
            let _ = err;
        }
    }

    fn register(&self, stream: TcpStream, peer_addr: SocketAddr) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let registration = Registration::new(Arc::clone(&self.num_connections));
        log::debug!(
            "accepted connection [{peer_addr}] token [{token}] open [{}]",
            registration.value()
        );

        // in the table before epoll can report it
        let _ = self
            .connections
            .insert(token, Connection::new(stream, peer_addr, registration));

        let added = match self.connections.get(&token) {
            Some(connection) => self
                .epoll
                .add(connection.stream(), EpollEvent::new(interest(), token)),
            None => return,
        };

        if let Err(err) = added {
            log::error!("failed to register connection [{peer_addr}]: {err}");
            let _ = err;
            if let Some((_, connection)) = self.connections.remove(&token) {
                connection.close(&self.epoll);
            }
        }
    }

    fn handle_connection(&self, token: u64) {
        let Some((_, mut connection)) = self.connections.remove(&token) else {
            log::warn!("readiness for unknown token [{token}]");
            return;
        };

        self.exchange(&mut connection);
        connection.close(&self.epoll);
    }

    /// One read, one dispatch, one write
    fn exchange(&self, connection: &mut Connection) {
        let raw = match connection.read_request(self.max_request_size) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("connection [{}] closed by peer", connection.peer_addr());
                return;
            }
            Err(err) => {
                log::error!("read from [{}] failed: {err}", connection.peer_addr());
                let _ = err;
                return;
            }
        };

        let request = Request::parse(raw);
        let response = match self.router.lookup(request.method(), request.route()) {
            Some(handler) => {
                let response = call_handler(handler, &request);
                log::info!("{}", access_line(&request, &response));
                response
            }
            None => {
                let response = Response::not_found();
                log::warn!("{}", access_line(&request, &response));
                response
            }
        };

        if let Err(err) = connection.respond(&response) {
            log::error!("write to [{}] failed: {err}", connection.peer_addr());
            let _ = err;
        }
    }

    /// Closes connections accepted but never served. Call after all workers returned.
    pub(crate) fn close_pending(&self) {
        let tokens: Vec<u64> = self.connections.iter().map(|entry| *entry.key()).collect();
        if !tokens.is_empty() {
            log::info!("closing {} pending connections", tokens.len());
        }
        for token in tokens {
            if let Some((_, connection)) = self.connections.remove(&token) {
                connection.close(&self.epoll);
            }
        }
    }
}

/// `"GET /" 200 OK`
#[cfg_attr(not(feature = "log"), allow(dead_code))]
fn access_line(request: &Request, response: &Response) -> String {
    let status_code = response.status_code();
    format!(
        "\"{} {}\" {} {}",
        request.method(),
        request.route(),
        status_code,
        status_code.default_reason_phrase().unwrap_or_default()
    )
}
