//! Route table binding `(method, path)` pairs to [`Handler`]s

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::common::Method;
use crate::log;
use crate::request::Request;
use crate::response::Response;

/// A `Handler` turns a [`Request`] into a [`Response`].
///
/// Handlers are shared by all worker threads, therefore `Send + Sync`.
/// A handler that fails should return an error response itself, eg. a `500`.
///
/// Closures and functions with the signature `Fn(&Request) -> Response` are
/// handlers already:
///
/// ```
/// # use brick::{Handler, Request, Response};
/// fn hello(_rq: &Request) -> Response {
///     Response::from_string("Hello, World!")
/// }
///
/// let rq = Request::parse(&b"GET / HTTP/1.1\r\n\r\n"[..]);
/// assert_eq!(hello.handle(&rq).body(), "Hello, World!");
/// ```
///
/// Implementing the trait is useful for handlers carrying state:
///
/// ```
/// # use brick::{Handler, Request, Response};
/// struct Static(&'static str);
///
/// impl Handler for Static {
///     fn handle(&self, _request: &Request) -> Response {
///         Response::from_string(self.0)
///     }
/// }
/// ```
pub trait Handler: Send + Sync {
    /// Answers `request`
    fn handle(&self, request: &Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> Response + Send + Sync,
{
    #[inline]
    fn handle(&self, request: &Request) -> Response {
        self(request)
    }
}

/// Mapping from method and exact path to a [`Handler`].
///
/// Matching is plain, case-sensitive string equality. There are no path
/// parameters, no wildcards and no trailing-slash normalization: `/foo` and
/// `/foo/` are different routes.
///
/// The table is filled before serving starts and only read afterwards, so the
/// worker threads share it without locking.
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, HashMap<String, Box<dyn Handler>>>,
}

impl Router {
    /// Creates an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` and `path`.
    ///
    /// A later registration for the same pair replaces the earlier one.
    pub fn register<M, P, H>(&mut self, method: M, path: P, handler: H)
    where
        M: Into<Method>,
        P: Into<String>,
        H: Handler + 'static,
    {
        let _ = self
            .routes
            .entry(method.into())
            .or_default()
            .insert(path.into(), Box::new(handler));
    }

    /// Returns the handler registered for `method` and `path`.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&dyn Handler> {
        self.routes
            .get(method)
            .and_then(|paths| paths.get(path))
            .map(|handler| &**handler)
    }

    /// Calls the handler matching `request` or answers [`Response::not_found`].
    ///
    /// A panicking handler is answered with `500 Internal Server Error`, the
    /// same way the server answers it on the wire.
    #[must_use]
    pub fn dispatch(&self, request: &Request) -> Response {
        match self.lookup(request.method(), request.route()) {
            Some(handler) => call_handler(handler, request),
            None => Response::not_found(),
        }
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    /// `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A panicking handler answers `500 Internal Server Error`
pub(crate) fn call_handler(handler: &dyn Handler, request: &Request) -> Response {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(request))) {
        Ok(response) => response,
        Err(_) => {
            log::error!(
                "handler for \"{} {}\" panicked",
                request.method(),
                request.route()
            );
            Response::new(500)
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (method, paths) in &self.routes {
            for path in paths.keys() {
                let _ = list.entry(&format_args!("{method} {path}"));
            }
        }
        list.finish()
    }
}
