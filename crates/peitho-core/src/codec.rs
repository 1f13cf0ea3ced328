//! Per-media-type body codecs.
//!
//! The pipeline never interprets bodies itself: a [`CodecRegistry`] maps
//! media types to [`Codec`] implementations that translate between raw bytes
//! and [`serde_json::Value`], the engine's interchange value. An unknown
//! request media type is rejected as 415 long before a codec is consulted,
//! so a codec failure here is a collaborator fault, not a client error.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::error::CodecError;

/// Translates between body bytes and structured values for one media type.
pub trait Codec: Send + Sync + 'static {
    /// Encodes a structured value into body bytes.
    fn encode(&self, media_type: &str, value: &Value) -> Result<Bytes, CodecError>;

    /// Decodes body bytes into a structured value.
    fn decode(&self, media_type: &str, bytes: &[u8]) -> Result<Value, CodecError>;
}

/// Registry of codecs keyed by media type.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn Codec>>,
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("CodecRegistry")
            .field("media_types", &types)
            .finish()
    }
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in codecs registered:
    /// `application/json` and `text/plain`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("application/json", JsonCodec);
        registry.register("text/plain", PlainTextCodec);
        registry
    }

    /// Registers a codec for a media type, replacing any previous codec.
    pub fn register<C: Codec>(&mut self, media_type: impl Into<String>, codec: C) {
        self.codecs.insert(media_type.into(), Arc::new(codec));
    }

    /// Removes the codec for a media type.
    pub fn unregister(&mut self, media_type: &str) {
        self.codecs.remove(media_type);
    }

    /// Returns true when a codec is registered for the media type.
    pub fn supports(&self, media_type: &str) -> bool {
        self.codecs.contains_key(media_type)
    }

    /// Encodes a value using the codec registered for the media type.
    pub fn encode(&self, media_type: &str, value: &Value) -> Result<Bytes, CodecError> {
        self.codecs
            .get(media_type)
            .ok_or_else(|| CodecError::Unregistered(media_type.to_string()))?
            .encode(media_type, value)
    }

    /// Decodes bytes using the codec registered for the media type.
    pub fn decode(&self, media_type: &str, bytes: &[u8]) -> Result<Value, CodecError> {
        self.codecs
            .get(media_type)
            .ok_or_else(|| CodecError::Unregistered(media_type.to_string()))?
            .decode(media_type, bytes)
    }
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, media_type: &str, value: &Value) -> Result<Bytes, CodecError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| CodecError::Encode {
                media_type: media_type.to_string(),
                source: e.into(),
            })
    }

    fn decode(&self, media_type: &str, bytes: &[u8]) -> Result<Value, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
            media_type: media_type.to_string(),
            source: e.into(),
        })
    }
}

/// Plain-text codec. Encodes strings verbatim and other values via their
/// JSON rendering; decodes to a string value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextCodec;

impl Codec for PlainTextCodec {
    fn encode(&self, _media_type: &str, value: &Value) -> Result<Bytes, CodecError> {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Ok(Bytes::from(text))
    }

    fn decode(&self, media_type: &str, bytes: &[u8]) -> Result<Value, CodecError> {
        let text = std::str::from_utf8(bytes).map_err(|e| CodecError::Decode {
            media_type: media_type.to_string(),
            source: e.into(),
        })?;
        Ok(Value::String(text.to_string()))
    }
}
