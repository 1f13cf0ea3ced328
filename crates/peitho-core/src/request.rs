//! Read-only request view consumed by the pipeline.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, CONTENT_LENGTH};
use http::Method;

/// An already-parsed HTTP request.
///
/// The transport layer owns message framing; Peitho only sees the method
/// token, the (case-insensitive) header map and the body bytes. The pipeline
/// never mutates a `Request`.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Creates a request from its parts.
    pub fn new(method: Method, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            headers,
            body,
        }
    }

    /// Creates a bodiless request.
    pub fn without_body(method: Method) -> Self {
        Self::new(method, HeaderMap::new(), Bytes::new())
    }

    /// The request method token.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request header map.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The request body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The entity length: the `Content-Length` header when present and
    /// parseable, otherwise the length of the body bytes.
    pub fn content_length(&self) -> u64 {
        self.header(&CONTENT_LENGTH)
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.body.len() as u64)
    }

    /// Returns true when the request carries an entity body.
    pub fn has_body(&self) -> bool {
        self.content_length() > 0
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts.method, parts.headers, body)
    }
}
