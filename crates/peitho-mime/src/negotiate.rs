//! The two negotiation operations the request pipeline performs.
//!
//! Response-side: [`match_accept`] picks the media type the response body
//! will be encoded in, from the client's `Accept` header and the resource's
//! supported types (highest priority first). Request-side:
//! [`match_content_type`] validates that a request body's `Content-Type`
//! can be decoded.

use crate::matcher::{best_match, best_match_in};
use crate::range::MediaRange;

/// Outcome of `Accept` negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Encode the response in this media type.
    Media(String),
    /// The resource declared no accept types; it may return anything.
    Any,
    /// Negotiation failed; the caller answers 406.
    Unacceptable,
}

/// Negotiates the response media type.
///
/// With no `Accept` header the first supported type wins ([`AcceptOutcome::Any`]
/// when the supported list is empty). With a header, quality matching applies;
/// a header that matches nothing still falls back to the first supported type
/// *unless* it explicitly rates `*/*` at zero, which is the only way a client
/// can insist on a 406 for unlisted types. A header with no parseable ranges
/// at all is treated the same as an absent one.
pub fn match_accept(header: Option<&str>, supported: &[String]) -> AcceptOutcome {
    if let Some(header) = header {
        let ranges = MediaRange::parse_header(header);
        if let Some(media_type) = best_match_in(supported.iter().map(String::as_str), &ranges) {
            return AcceptOutcome::Media(media_type);
        }
        let refuses_everything = ranges
            .iter()
            .any(|range| range.kind() == "*" && range.subtype() == "*" && range.quality() == 0.0);
        if refuses_everything {
            return AcceptOutcome::Unacceptable;
        }
    }

    match supported.first() {
        Some(first) => AcceptOutcome::Media(first.clone()),
        None => AcceptOutcome::Any,
    }
}

/// Validates a request body's `Content-Type` against the supported list.
/// `None` means the body cannot be decoded and the caller answers 415.
pub fn match_content_type(header: &str, supported: &[String]) -> Option<String> {
    best_match(supported.iter().map(String::as_str), header)
}
