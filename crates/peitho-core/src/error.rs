//! Error taxonomy.
//!
//! Three distinct failure classes exist in Peitho, and they never mix:
//!
//! - [`ConfigError`] - a resource descriptor is inconsistent. Raised once at
//!   build time and fatal; a request never observes it.
//! - [`HookError`] - an external collaborator (authorization hook, storage
//!   lookup, handler) failed unexpectedly. The pipeline converts it into a
//!   500-class response and records the cause.
//! - [`CodecError`] - a registered body codec failed to encode or decode.
//!
//! Client 4xx outcomes are *not* errors: they are ordinary terminal
//! responses produced by the decision tree.

use http::Method;
use thiserror::Error;

/// A resource descriptor failed validation at build time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A method was declared allowed without a registered handler.
    #[error("the {method} method is declared allowed but has no handler")]
    MissingHandler {
        /// The offending method token.
        method: Method,
    },

    /// A declared method is outside the fixed method table.
    #[error("unknown method {method} cannot be declared on a resource")]
    UnknownMethod {
        /// The offending method token.
        method: Method,
    },

    /// A rate limit was configured with a zero count or window.
    #[error("rate limit requires a non-zero count and window")]
    InvalidRateLimit,
}

/// An external hook, handler or lookup failed unexpectedly.
///
/// Carries an optional opaque source for observability; the pipeline logs
/// it and answers with a 500, never exposing the cause to the client.
#[derive(Debug, Error)]
#[error("hook failure: {message}")]
pub struct HookError {
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

impl HookError {
    /// Creates a hook error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a hook error wrapping an underlying cause.
    pub fn with_source(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The hook failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A body codec failed.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No codec is registered for the media type.
    #[error("no codec registered for {0}")]
    Unregistered(String),

    /// Encoding a value to bytes failed.
    #[error("encoding {media_type} failed")]
    Encode {
        /// The media type being encoded.
        media_type: String,
        /// The underlying codec failure.
        #[source]
        source: anyhow::Error,
    },

    /// Decoding bytes to a value failed.
    #[error("decoding {media_type} failed")]
    Decode {
        /// The media type being decoded.
        media_type: String,
        /// The underlying codec failure.
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_the_method() {
        let err = ConfigError::MissingHandler {
            method: Method::PUT,
        };
        assert!(err.to_string().contains("PUT"));
    }

    #[test]
    fn hook_error_carries_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "storage timeout");
        let err = HookError::with_source("etag lookup failed", io);
        assert_eq!(err.message(), "etag lookup failed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn codec_error_display() {
        let err = CodecError::Unregistered("application/xml".into());
        assert_eq!(err.to_string(), "no codec registered for application/xml");
    }
}
