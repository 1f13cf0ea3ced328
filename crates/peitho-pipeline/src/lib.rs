//! # Peitho Pipeline
//!
//! The decision tree that turns a declarative resource description into
//! HTTP responses.
//!
//! A resource is described once through a [`DescriptorBuilder`] (which
//! methods it answers, which media types it speaks, its availability,
//! throttling and caching posture) and validated into an immutable
//! [`ResourceDescriptor`]. A [`Pipeline`] binds that descriptor to a
//! [`Resource`](peitho_core::Resource) hook implementation and evaluates
//! every request against the canonical ordered stages (503, 401, 403, 429,
//! `OPTIONS`, 415, 413, 405, 406, 404, 410, 428, 412, 304), short-circuiting
//! on the first failure and otherwise dispatching to the method handler.
//!
//! ```
//! use http::Method;
//! use peitho_core::{DefaultResource, Request};
//! use peitho_pipeline::{Pipeline, Reply, ResourceDescriptor};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let descriptor = ResourceDescriptor::builder()
//!     .handler(Method::GET, |_cx| {
//!         Box::pin(async { Ok(Reply::Value(serde_json::json!({"ok": true}))) })
//!     })
//!     .build()
//!     .unwrap();
//! let pipeline = Pipeline::new(descriptor, DefaultResource);
//!
//! let response = pipeline.handle(Request::without_body(Method::GET)).await;
//! assert_eq!(response.status().unwrap().as_u16(), 200);
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/peitho-pipeline/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod conditional;
mod context;
mod descriptor;
mod pipeline;
mod postprocess;
pub mod rate_limit;

pub use context::Exchange;
pub use descriptor::{
    CachePolicy, CacheScope, DescriptorBuilder, Handler, MaxAge, Reply, ResourceDescriptor,
    Unavailable,
};
pub use pipeline::{Pipeline, Stage};
pub use rate_limit::{Admission, RateLimiter};
