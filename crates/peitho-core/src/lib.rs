//! # Peitho Core
//!
//! Core types and traits for the Peitho HTTP semantics engine.
//!
//! This crate provides the foundational vocabulary used throughout Peitho:
//!
//! - [`Request`] - Read-only view of an already-parsed HTTP request
//! - [`Response`] - Mutable response accumulator with a sentinel status
//! - [`Resource`] - Hook trait resources implement to answer availability,
//!   authorization, and conditional-state queries
//! - [`CodecRegistry`] - Per-media-type body encoders/decoders
//! - [`method`] - The fixed HTTP method table with safety metadata
//! - [`status`] - Named status-code constants used by the decision tree
//! - [`httpdate`] - HTTP-date parsing and formatting

#![doc(html_root_url = "https://docs.rs/peitho-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod codec;
mod error;
pub mod httpdate;
pub mod method;
mod request;
mod resource;
mod response;
pub mod status;

pub use codec::{Codec, CodecRegistry, JsonCodec, PlainTextCodec};
pub use error::{CodecError, ConfigError, HookError};
pub use request::Request;
pub use resource::{BoxFuture, DefaultResource, HookResult, Resource};
pub use response::Response;
