//! HTTP/1.1 request parsing on top of the [`httparse`] crate.

use bytes::Bytes;
use thiserror::Error;

use super::{Headers, Method};

/// Errors that can occur while parsing a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The buffer does not yet hold a complete request head; read more
    /// bytes and retry.
    #[error("incomplete request head")]
    Incomplete,

    #[error("malformed request: {0}")]
    Malformed(#[from] httparse::Error),

    #[error("request line is missing its {field}")]
    MissingField { field: &'static str },
}

/// A parsed HTTP/1.1 request.
///
/// Produced by [`Request::parse`] from a raw byte buffer. Any query string
/// is split off the path and discarded: no route in this server consumes
/// request parameters.
///
/// # Examples
///
/// ```
/// use greeter::http::Request;
///
/// let raw = b"GET /?lang=en HTTP/1.1\r\nHost: localhost\r\n\r\n";
/// let (request, _offset) = Request::parse(raw).unwrap();
///
/// assert_eq!(request.method().as_str(), "GET");
/// assert_eq!(request.path(), "/");
/// assert_eq!(request.headers().get("host"), Some("localhost"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    /// HTTP minor version: 0 for HTTP/1.0, 1 for HTTP/1.1.
    version: u8,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Maximum number of headers accepted per request.
    const MAX_HEADERS: usize = 64;

    /// Parses a request from `buf`.
    ///
    /// On success returns the request and the offset at which the body
    /// begins (just past the blank line terminating the head). Everything
    /// in `buf` from that offset on is taken as the body; callers that
    /// buffer incrementally should compare against [`content_length`]
    /// before dispatching.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Incomplete`] when the head is not fully buffered yet.
    /// - [`RequestError::Malformed`] when the bytes are not valid HTTP.
    /// - [`RequestError::MissingField`] when the request line lacks a
    ///   method, path, or version.
    ///
    /// [`content_length`]: Self::content_length
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), RequestError> {
        let mut header_storage = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut head = httparse::Request::new(&mut header_storage);

        let body_offset = match head.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(RequestError::Incomplete),
        };

        let method = Method::from(
            head.method
                .ok_or(RequestError::MissingField { field: "method" })?,
        );

        let target = head
            .path
            .ok_or(RequestError::MissingField { field: "path" })?;
        let path = match target.split_once('?') {
            Some((path, _query)) => path.to_owned(),
            None => target.to_owned(),
        };

        let version = head
            .version
            .ok_or(RequestError::MissingField { field: "version" })?;

        let mut headers = Headers::with_capacity(head.headers.len());
        for header in head.headers.iter() {
            // Header values are not required to be UTF-8; non-UTF-8
            // values are dropped.
            if let Ok(value) = std::str::from_utf8(header.value) {
                headers.insert(header.name, value);
            }
        }

        let body = Bytes::copy_from_slice(&buf[body_offset..]);

        Ok((
            Self {
                method,
                path,
                version,
                headers,
                body,
            },
            body_offset,
        ))
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path, without any query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP minor version (0 for HTTP/1.0, 1 for HTTP/1.1).
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the request body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns `true` if the connection should stay open after this request.
    ///
    /// HTTP/1.1 defaults to keep-alive; HTTP/1.0 defaults to close unless
    /// the client sent `Connection: keep-alive`.
    pub fn is_keep_alive(&self) -> bool {
        match self.headers.get("connection") {
            Some(value) => value.eq_ignore_ascii_case("keep-alive"),
            None => self.version == 1,
        }
    }

    /// Returns the parsed `Content-Length` header value, if present.
    pub fn content_length(&self) -> Option<usize> {
        self.headers.get("content-length")?.parse().ok()
    }
}
