//! Mutable response accumulator.
//!
//! A [`Response`] starts with an *unset* status and is threaded through the
//! pipeline stages, each of which may set the status or add headers. Exactly
//! one status is set before the response leaves the pipeline; finalizing an
//! accumulator that was never assigned a status yields `200 OK`.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use http::StatusCode;
use http_body_util::Full;

/// Mutable accumulator for the outgoing response.
#[derive(Debug, Clone, Default)]
pub struct Response {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Creates an empty accumulator with no status set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accumulator with the given terminal status.
    pub fn with_status(status: StatusCode) -> Self {
        let mut response = Self::new();
        response.set_status(status);
        response
    }

    /// Creates a terminal response that downstream caches must not store:
    /// `Cache-Control: no-cache`, `Pragma: no-cache` and `Expires: 0`.
    pub fn uncacheable(status: StatusCode) -> Self {
        let mut response = Self::with_status(status);
        response.insert(CACHE_CONTROL, "no-cache");
        response.insert(PRAGMA, "no-cache");
        response.insert(EXPIRES, "0");
        response
    }

    /// The status set so far, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Sets the response status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Inserts a header, replacing any previous value. Values that are not
    /// valid header text are dropped rather than panicking.
    pub fn insert(&mut self, name: HeaderName, value: &str) {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
    }

    /// Inserts a header only when it is not already set.
    pub fn insert_if_unset(&mut self, name: HeaderName, value: &str) {
        if !self.headers.contains_key(&name) {
            self.insert(name, value);
        }
    }

    /// The response body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Replaces the response body.
    pub fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }

    /// Finalizes the accumulator into a wire response. An unset status
    /// defaults to `200 OK`.
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status.unwrap_or(StatusCode::OK));
        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers;
        }
        builder
            .body(Full::new(self.body))
            .expect("status and headers are pre-validated")
    }
}
