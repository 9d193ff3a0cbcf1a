use std::{convert::Infallible, fmt, str::FromStr};

/// HTTP request methods
///
/// As per [RFC 7231](https://tools.ietf.org/html/rfc7231#section-4.1) and
/// [RFC 5789](https://tools.ietf.org/html/rfc5789)
///
/// Parsing is case-sensitive: `get` is not [`Method::Get`] but a
/// [`Method::NonStandard`] token, so routes registered for `GET` never match it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `CONNECT`
    Connect,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
    /// `PATCH`
    Patch,
    /// Any other token, kept exactly as received
    NonStandard(String),
}

impl Method {
    /// The method token as it appears on the wire
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
            Method::NonStandard(s) => s.as_str(),
        }
    }
}

impl Default for Method {
    /// An unparsed request has an empty method token.
    fn default() -> Self {
        Method::NonStandard(String::new())
    }
}

impl FromStr for Method {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Method, Infallible> {
        Ok(Method::from(s.as_bytes()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}

impl From<&[u8]> for Method {
    fn from(b: &[u8]) -> Self {
        match b {
            b"GET" => Method::Get,
            b"HEAD" => Method::Head,
            b"POST" => Method::Post,
            b"PUT" => Method::Put,
            b"DELETE" => Method::Delete,
            b"CONNECT" => Method::Connect,
            b"OPTIONS" => Method::Options,
            b"TRACE" => Method::Trace,
            b"PATCH" => Method::Patch,
            _ => Method::NonStandard(String::from_utf8_lossy(b).into_owned()),
        }
    }
}
