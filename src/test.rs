use crate::{Method, Request};

/// A simpler version of [`Request`] that is useful for testing. No data actually goes anywhere.
///
/// By default, `TestRequest` pretends to be a `GET` request for the server root (`/`)
/// with no headers and `HTTP/1.1`. To create a `TestRequest` with different parameters,
/// use the builder pattern:
///
/// ```
/// # use brick::{Method, TestRequest};
/// let request = TestRequest::new()
///     .with_method(Method::Post)
///     .with_path("/api/widgets")
///     .with_header("Content-Type", "text/plain")
///     .with_body("42");
/// ```
///
/// Then, convert the `TestRequest` into a real `Request` and pass it to the handler under test:
///
/// ```
/// # use brick::{Method, Request, Response, Router, StatusCode, TestRequest};
/// # let request = TestRequest::new()
/// #     .with_method(Method::Post)
/// #     .with_path("/api/widgets")
/// #     .with_body("42");
/// let mut router = Router::new();
/// router.register("POST", "/api/widgets", |rq: &Request| {
///     Response::from_string(rq.body_str().unwrap_or_default())
/// });
///
/// let response = router.dispatch(&request.into());
/// assert_eq!(response.status_code(), StatusCode(200));
/// assert_eq!(response.body(), "42");
/// ```
///
/// The conversion goes through the wire format and [`Request::parse`], so the
/// result is exactly what a handler gets for these bytes from a socket.
#[derive(Clone, Debug)]
pub struct TestRequest {
    body: Vec<u8>,
    headers: Vec<(String, String)>,
    http_version: String,
    method: Method,
    path: String,
}

impl From<TestRequest> for Request {
    fn from(mock: TestRequest) -> Request {
        Request::parse(mock.to_bytes())
    }
}

impl Default for TestRequest {
    fn default() -> Self {
        TestRequest {
            body: Vec::new(),
            headers: Vec::new(),
            http_version: String::from("HTTP/1.1"),
            method: Method::Get,
            path: String::from("/"),
        }
    }
}

impl TestRequest {
    /// `GET /` with `HTTP/1.1`, no headers and no body
    #[must_use]
    pub fn new() -> Self {
        TestRequest::default()
    }

    /// Replaces the body, sent as is after the empty line
    #[must_use]
    pub fn with_body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the method token of the request line
    #[must_use]
    pub fn with_method<M: Into<Method>>(mut self, method: M) -> Self {
        self.method = method.into();
        self
    }

    /// Sets the path of the request line, query string included
    #[must_use]
    pub fn with_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the version token of the request line
    #[must_use]
    pub fn with_http_version<V: Into<String>>(mut self, version: V) -> Self {
        self.http_version = version.into();
        self
    }

    /// Appends a header line. Nothing is added implicitly, not even `Content-Length`.
    #[must_use]
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The request as it would arrive on a socket
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("{} {} {}\r\n", self.method, self.path, self.http_version);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");

        let mut out = out.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test() {
        let request = Request::from(TestRequest::new());
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.route(), "/");
        assert_eq!(request.http_version(), "HTTP/1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn to_bytes_test() {
        let mock = TestRequest::new()
            .with_method("PUT")
            .with_path("/a")
            .with_header("Host", "localhost")
            .with_body("x=1");
        assert_eq!(
            mock.to_bytes(),
            b"PUT /a HTTP/1.1\r\nHost: localhost\r\n\r\nx=1".to_vec()
        );
    }

    #[test]
    fn into_request_test() {
        let request: Request = TestRequest::new()
            .with_method(Method::Post)
            .with_path("/api/widgets")
            .with_header("Content-Type", "text/plain")
            .with_http_version("HTTP/1.0")
            .with_body("42")
            .into();

        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.route(), "/api/widgets");
        assert_eq!(request.http_version(), "HTTP/1.0");
        assert_eq!(request.header("Content-Type"), Some("text/plain"));
        assert_eq!(request.body_str(), Some("42"));
    }
}
