//! # Peitho
//!
//! **A declarative HTTP resource semantics engine**
//!
//! Peitho turns a declarative description of a REST resource (which methods
//! it answers, which media types it speaks, its availability, throttling and
//! caching posture) into correct HTTP responses, by evaluating every
//! request against the canonical status-code decision tree:
//!
//! ```text
//! 503 → 401 → 403 → 429 → OPTIONS → 415 → 413 → 405 → 406
//!     → 404 → 410 → 428 → 412 → 304 → handler dispatch
//! ```
//!
//! The first failing check terminates the request with its status; a request
//! surviving all of them is dispatched to the registered method handler and
//! its reply is normalized (content negotiation, cache validators, `HEAD`
//! body stripping) on the way out. Peitho owns none of the transport: it
//! consumes already-parsed requests and produces responses, leaving message
//! framing, routing and TLS to the embedding server.
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use peitho::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let descriptor = ResourceDescriptor::builder()
//!         .handler(Method::GET, |_cx| {
//!             Box::pin(async { Ok(Reply::Value(serde_json::json!({"ok": true}))) })
//!         })
//!         .use_etags(true)
//!         .build()
//!         .expect("descriptor is consistent");
//!
//!     let pipeline = Pipeline::new(descriptor, DefaultResource);
//!     let response = pipeline.handle(Request::without_body(Method::GET)).await;
//!     assert_eq!(response.status().unwrap().as_u16(), 200);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/peitho/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use peitho_core as core;

// Re-export media-type matching and negotiation
pub use peitho_mime as mime;

// Re-export the pipeline and descriptors
pub use peitho_pipeline as pipeline;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use peitho::prelude::*;
/// ```
pub mod prelude {
    pub use peitho_core::{
        BoxFuture, Codec, CodecError, CodecRegistry, ConfigError, DefaultResource, HookError,
        HookResult, Request, Resource, Response,
    };

    // Named status constants for assertions
    pub use peitho_core::status;

    // Negotiation entry points
    pub use peitho_mime::{best_match, match_accept, match_content_type, AcceptOutcome};

    // Descriptors and the pipeline
    pub use peitho_pipeline::{
        CachePolicy, CacheScope, DescriptorBuilder, MaxAge, Pipeline, Reply, ResourceDescriptor,
        Unavailable,
    };
}
