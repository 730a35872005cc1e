//! HTTP/1.1 response construction and serialization.

use bytes::{BufMut, BytesMut};

use super::{Headers, StatusCode};

/// An outgoing HTTP/1.1 response.
///
/// Built with [`Response::new`] or the [`Response::text`] shorthand, then
/// serialized exactly once with [`Response::into_bytes`].
///
/// # Examples
///
/// ```
/// use greeter::http::Response;
///
/// let bytes = Response::text("Hello World!").into_bytes();
/// let wire = std::str::from_utf8(&bytes).unwrap();
/// assert!(wire.starts_with("HTTP/1.1 200 OK\r\n"));
/// assert!(wire.ends_with("\r\n\r\nHello World!"));
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Vec<u8>,
    keep_alive: bool,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
            keep_alive: true,
        }
    }

    /// Creates a `200 OK` response carrying `body` as plain text.
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(StatusCode::Ok).body(body)
    }

    /// Sets the response body from a string.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Appends a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Selects the `Connection: keep-alive` or `Connection: close` header.
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Returns the status code of this response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Serializes the response into HTTP/1.1 wire format.
    ///
    /// Adds `Content-Type: text/plain; charset=utf-8` when the body is
    /// non-empty and no content type was set, a `Connection` header
    /// reflecting [`keep_alive`](Self::keep_alive), and always a
    /// `Content-Length`.
    pub fn into_bytes(mut self) -> BytesMut {
        let length = self.body.len();

        if !self.body.is_empty() && !self.headers.contains("content-type") {
            self.headers.insert("Content-Type", "text/plain; charset=utf-8");
        }
        let connection = if self.keep_alive { "keep-alive" } else { "close" };
        self.headers.insert("Connection", connection);

        let mut buf = BytesMut::with_capacity(64 + self.headers.len() * 48 + length);
        buf.put(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());
        for (name, value) in self.headers.iter() {
            buf.put(format!("{name}: {value}\r\n").as_bytes());
        }
        // Content-Length closes the head, right before the blank line.
        buf.put(format!("Content-Length: {length}\r\n\r\n").as_bytes());
        buf.put(self.body.as_slice());
        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}
