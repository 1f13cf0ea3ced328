//! # Peitho Mime
//!
//! RFC 7231 §5.3 media-range parsing and quality-value matching, plus the
//! content negotiator built on top of it.
//!
//! The matcher is a stateless leaf: [`best_match`] picks the best supported
//! media type for an `Accept` (or `Content-Type`) header, weighting
//! candidates by the client's quality values and breaking ties by
//! specificity (exact type beats `type/*` beats `*/*`) and then by the
//! server's configured priority order. [`negotiate`] wraps the matcher in
//! the two operations the request pipeline actually performs.

#![doc(html_root_url = "https://docs.rs/peitho-mime/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod matcher;
pub mod negotiate;
mod range;

pub use matcher::{best_match, quality};
pub use negotiate::{match_accept, match_content_type, AcceptOutcome};
pub use range::MediaRange;
