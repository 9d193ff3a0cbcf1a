//! # Simple usage
//!
//! ## Creating the server
//!
//! `brick` is a small HTTP/1.x server. Every accepted connection carries exactly one
//! request and gets exactly one response, then it is closed.
//!
//! Create a [`Server`] and register a handler for each method and path you want to answer:
//!
//! ```no_run
//! use brick::{Request, Response, Server};
//!
//! let mut server = Server::new();
//! let _ = server.route("/", "GET", |_rq: &Request| Response::from_string("Hello, World!"));
//! ```
//!
//! Paths are matched exactly and case-sensitively. A request without a matching route
//! is answered with `404`, a handler that panics with `500`.
//!
//! ## Running the server
//!
//! `start()` binds the port, runs the worker threads and blocks until the process gets
//! `SIGINT` or `SIGTERM`. If the server can't be set up, the process exits with status `1`.
//!
//! ```no_run
//! # let server = brick::Server::new();
//! server.start(3000);
//! ```
//!
//! To handle setup errors yourself, or to stop the server from code, split it into
//! `listen()` and `serve()`:
//!
//! ```no_run
//! # fn main() -> std::io::Result<()> {
//! # let server = brick::Server::new();
//! let server = server.listen(0)?;
//! println!("listening on {}", server.local_addr());
//!
//! let handle = server.shutdown_handle();
//! std::thread::spawn(move || {
//!     std::thread::sleep(std::time::Duration::from_secs(10));
//!     handle.shutdown();
//! });
//!
//! server.serve()
//! # }
//! ```
//!
//! ## Handling requests
//!
//! A handler gets the parsed [`Request`] and returns a [`Response`]. Nothing is added
//! to the response implicitly, set `Content-Length` and the like yourself:
//!
//! ```
//! use brick::{Request, Response};
//!
//! fn mirror(rq: &Request) -> Response {
//!     let body = rq.body_str().unwrap_or_default();
//!     Response::from_string(body)
//!         .with_header("Content-Length", body.len().to_string())
//!         .with_header("Content-Type", "text/plain")
//! }
//! ```
//!
//! Handlers can be tested without a socket with [`TestRequest`].
//!
//! ## Logging
//!
//! With the default `log` feature the server logs through the [`log`](https://docs.rs/log)
//! facade. Pick any logger implementation in your binary, eg. `env_logger`.

pub use common::{limits, Method, StatusCode};
pub use request::Request;
pub use response::Response;
pub use router::{Handler, Router};
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use server::{state, Server, ShutdownHandle, State};
pub use server_config::ServerConfig;
pub use socket_config::SocketConfig;
pub use test::TestRequest;

mod common;
#[cfg(any(target_os = "linux", target_os = "android"))]
mod connection;
#[cfg(any(target_os = "linux", target_os = "android"))]
mod event_loop;
mod log;
mod request;
mod response;
mod router;
#[cfg(any(target_os = "linux", target_os = "android"))]
mod server;
mod server_config;
mod socket_config;
#[cfg(any(target_os = "linux", target_os = "android"))]
mod socket_listener;
mod test;
#[cfg(any(target_os = "linux", target_os = "android"))]
mod util;
