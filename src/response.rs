//! [`Response`] builder and its wire serialization

use std::collections::BTreeMap;
use std::io::{Result as IoResult, Write};

use crate::common::StatusCode;

/// Object representing an HTTP response.
///
/// A handler creates it, fills it with the setters or the `with_*` builder
/// methods and returns it. The server serializes it once and discards it.
///
/// Nothing is added implicitly: a response without headers goes out without
/// headers. If the client needs `Content-Length` or `Connection: close`, set
/// them explicitly.
///
/// ```
/// use brick::Response;
///
/// let response = Response::from_string("ok").with_header("Content-Length", "2");
/// assert_eq!(
///     response.serialize(),
///     b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok".to_vec()
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    body: String,
    headers: BTreeMap<String, String>,
    status_code: StatusCode,
}

impl Response {
    /// Creates a response with `status_code`, no headers and an empty body.
    #[must_use]
    pub fn new<S: Into<StatusCode>>(status_code: S) -> Self {
        Response {
            body: String::new(),
            headers: BTreeMap::new(),
            status_code: status_code.into(),
        }
    }

    /// Same as [`Response::new`].
    #[must_use]
    #[inline]
    pub fn empty<S: Into<StatusCode>>(status_code: S) -> Self {
        Self::new(status_code)
    }

    /// Creates a `200 OK` response with `data` as body.
    #[must_use]
    pub fn from_string<D: Into<String>>(data: D) -> Self {
        Self::new(200).with_body(data)
    }

    /// The response sent when no route matches: `404`, no headers, no body.
    #[must_use]
    #[inline]
    pub fn not_found() -> Self {
        Self::new(404)
    }

    /// Replaces the whole body.
    pub fn set_body<D: Into<String>>(&mut self, data: D) {
        self.body = data.into();
    }

    /// Sets header `name`, replacing a previous value of the same name.
    pub fn set_header<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let _ = self.headers.insert(name.into(), value.into());
    }

    /// Changes the status code.
    pub fn set_status_code<S: Into<StatusCode>>(&mut self, status_code: S) {
        self.status_code = status_code.into();
    }

    /// Builder variant of [`Response::set_body`].
    #[must_use]
    pub fn with_body<D: Into<String>>(mut self, data: D) -> Self {
        self.set_body(data);
        self
    }

    /// Builder variant of [`Response::set_header`].
    #[must_use]
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.set_header(name, value);
        self
    }

    /// Builder variant of [`Response::set_status_code`].
    #[must_use]
    pub fn with_status_code<S: Into<StatusCode>>(mut self, status_code: S) -> Self {
        self.set_status_code(status_code);
        self
    }

    /// Returns the status code.
    #[must_use]
    #[inline]
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Returns the body.
    #[must_use]
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the value of header `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Returns all headers.
    #[must_use]
    #[inline]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Writes the status line, the headers, the empty line and the body to `writer`.
    ///
    /// # Errors
    ///
    /// `std::io::Error` from `writer`
    ///
    pub fn raw_print<W: Write>(&self, mut writer: W) -> IoResult<()> {
        write!(
            writer,
            "HTTP/1.1 {} {}\r\n",
            self.status_code.0,
            self.status_code.default_reason_phrase().unwrap_or_default()
        )?;

        for (name, value) in &self.headers {
            write!(writer, "{name}: {value}\r\n")?;
        }

        writer.write_all(b"\r\n")?;
        writer.write_all(self.body.as_bytes())
    }

    /// Returns the complete wire representation.
    ///
    /// Pure projection of the current state, can be called any number of times.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.body.len());
        // writing into a Vec cannot fail
        let _ = self.raw_print(&mut out);
        out
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::not_found()
    }
}
