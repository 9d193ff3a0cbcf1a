use std::collections::BTreeMap;
use std::ops::Range;

use crate::common::Method;

/// Represents an HTTP request read from a client.
///
/// A `Request` is built once per accepted connection from the bytes of a single
/// read and is immutable afterwards. Handlers get it by reference.
///
/// Parsing never fails. Bytes that do not form a valid request produce a
/// request whose unreached fields are left empty, which then usually ends up
/// as a `404` because no route matches.
///
/// # Testing
///
/// To build requests for handler tests without a socket, use
/// [`TestRequest`](crate::TestRequest).
#[derive(Clone, Debug)]
pub struct Request {
    // range of `raw` holding the body
    body: Range<usize>,
    headers: BTreeMap<String, String>,
    http_version: String,
    method: Method,
    // the bytes the request was parsed from
    raw: Vec<u8>,
    route: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Method,
    Uri,
    HttpVersion,
    HeaderName,
    HeaderValue,
}

impl Request {
    /// Parses `raw` in a single forward pass.
    ///
    /// The request line is split on single spaces, the version ends at the first
    /// `CRLF`, then `Name: Value` lines follow until an empty line. Every byte
    /// after the empty line is the body, whatever `Content-Length` claims.
    ///
    /// Malformed input is handled leniently:
    ///
    /// - a header line without a colon is dropped
    /// - duplicate header names keep the last value
    /// - spaces after the colon are skipped, spaces before it are kept
    /// - a NUL byte before the end of the headers ends the scan
    /// - without the empty line there is no body
    ///
    /// ```
    /// let rq = brick::Request::parse(&b"GET /hello HTTP/1.1\r\nHost: x\r\n\r\nbody"[..]);
    /// assert_eq!(rq.route(), "/hello");
    /// assert_eq!(rq.header("Host"), Some("x"));
    /// assert_eq!(rq.body(), b"body");
    /// ```
    #[must_use]
    pub fn parse(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();

        let mut method = Method::default();
        let mut route = String::new();
        let mut http_version = String::new();
        let mut headers = BTreeMap::new();
        let mut body_start = None;

        let mut state = State::Method;
        let mut key = String::new();
        let mut low = 0;
        let mut i = 0;

        while i < raw.len() {
            let byte = raw[i];
            if byte == 0 {
                break;
            }
            let line_end = byte == b'\n' && i > 0 && raw[i - 1] == b'\r';

            match state {
                State::Method => {
                    if byte == b' ' {
                        method = Method::from(&raw[low..i]);
                        low = i + 1;
                        state = State::Uri;
                    }
                }
                State::Uri => {
                    if byte == b' ' {
                        route = lossy(&raw[low..i]);
                        low = i + 1;
                        state = State::HttpVersion;
                    }
                }
                State::HttpVersion => {
                    if line_end && i >= low + 3 {
                        http_version = lossy(&raw[low..i - 1]);
                        low = i + 1;
                        state = State::HeaderName;
                    }
                }
                State::HeaderName => {
                    if line_end {
                        if i == low + 1 {
                            body_start = Some(i + 1);
                            break;
                        }
                        // no colon on this line
                        low = i + 1;
                    } else if byte == b':' {
                        key = lossy(&raw[low..i]);
                        i += 1;
                        while i < raw.len() && raw[i] == b' ' {
                            i += 1;
                        }
                        low = i;
                        state = State::HeaderValue;
                        continue;
                    }
                }
                State::HeaderValue => {
                    if line_end && i > low {
                        let _ = headers.insert(std::mem::take(&mut key), lossy(&raw[low..i - 1]));
                        low = i + 1;
                        state = State::HeaderName;
                    }
                }
            }

            i += 1;
        }

        let body = match body_start {
            Some(start) => start..raw.len(),
            None => raw.len()..raw.len(),
        };

        Request {
            body,
            headers,
            http_version,
            method,
            raw,
            route,
        }
    }

    /// Returns the method requested by the client (eg. `GET`, `POST`, etc.).
    #[must_use]
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the requested path exactly as sent, query string included.
    #[must_use]
    #[inline]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns the HTTP version token of the request line, eg. `HTTP/1.1`.
    #[must_use]
    #[inline]
    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    /// Returns all headers, names cased as received.
    #[must_use]
    #[inline]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns the value of the header `name`, matched case-sensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns the body bytes.
    #[must_use]
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.raw[self.body.clone()]
    }

    /// Returns the body if it is valid UTF-8.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(self.body()).ok()
    }

    /// Returns the bytes this request was parsed from.
    #[must_use]
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// `true` when method, route and version were all found.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.method.as_str().is_empty() && !self.route.is_empty() && !self.http_version.is_empty()
    }
}

impl From<Vec<u8>> for Request {
    fn from(raw: Vec<u8>) -> Self {
        Request::parse(raw)
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
