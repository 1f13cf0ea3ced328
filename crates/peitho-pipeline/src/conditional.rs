//! Conditional-request evaluation (RFC 7232).
//!
//! Three questions, each answered against the resource's current validators:
//!
//! - does a write *need* a conditional header it did not send (428)?
//! - does a sent precondition fail against current state (412)?
//! - is the client's cached representation still current (304)?
//!
//! Entity tags take precedence over modification dates: when an `If-Match`
//! or `If-None-Match` header is present its verdict is final and the date
//! headers are not consulted (RFC 7232 §6).

use http::header::{IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE};
use peitho_core::{httpdate, HookError, Request, Resource};

/// Extracts the opaque tag from a conditional header value: the optional
/// `W/` weak prefix and surrounding quotes are stripped. `None` when nothing
/// usable remains.
pub fn parse_entity_tag(value: &str) -> Option<String> {
    let tag = value.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    let tag = tag.trim().trim_matches('"');
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Evaluates conditional headers for one resource configuration.
pub struct ConditionalEvaluator<'a> {
    resource: &'a dyn Resource,
    use_etags: bool,
    use_last_modified: bool,
}

impl<'a> ConditionalEvaluator<'a> {
    /// Creates an evaluator over the resource's hooks, gated by which
    /// validators the descriptor enables.
    pub fn new(resource: &'a dyn Resource, use_etags: bool, use_last_modified: bool) -> Self {
        Self {
            resource,
            use_etags,
            use_last_modified,
        }
    }

    /// Whether any validator is enabled at all.
    pub fn enabled(&self) -> bool {
        self.use_etags || self.use_last_modified
    }

    /// Whether a write is missing a conditional header the resource demands:
    /// `If-Match` when entity tags are enabled, `If-Unmodified-Since` when
    /// modification dates are.
    pub fn precondition_required(&self, request: &Request) -> bool {
        if self.use_etags && request.header(&IF_MATCH).is_none() {
            return true;
        }
        if self.use_last_modified && request.header(&IF_UNMODIFIED_SINCE).is_none() {
            return true;
        }
        false
    }

    /// Whether a sent precondition fails against current state (412).
    pub async fn precondition_failed(&self, request: &Request) -> Result<bool, HookError> {
        if self.use_etags {
            if let Some(header) = request.header(&IF_MATCH) {
                let sent = parse_entity_tag(header);
                let current = self.resource.etag(request, sent.as_deref()).await?;
                // If-Match was sent, so its verdict is final.
                return Ok(match (sent, current) {
                    (Some(sent), Some(current)) => sent != current,
                    // No current tag, or an unusable sent tag: cannot match.
                    _ => true,
                });
            }
        }
        if self.use_last_modified {
            if let Some(header) = request.header(&IF_UNMODIFIED_SINCE) {
                if let (Some(condition), Some(current)) = (
                    httpdate::parse(header),
                    self.resource.last_modified(request).await?,
                ) {
                    return Ok(httpdate::truncate_to_seconds(current) > condition);
                }
            }
        }
        Ok(false)
    }

    /// Whether the client's cached representation is still current (304).
    pub async fn not_modified(&self, request: &Request) -> Result<bool, HookError> {
        if self.use_etags {
            if let Some(header) = request.header(&IF_NONE_MATCH) {
                let sent = parse_entity_tag(header);
                let current = self.resource.etag(request, sent.as_deref()).await?;
                // If-None-Match was sent, so its verdict is final.
                return Ok(match (sent, current) {
                    (Some(sent), Some(current)) => sent == current,
                    _ => false,
                });
            }
        }
        if self.use_last_modified {
            if let Some(header) = request.header(&IF_MODIFIED_SINCE) {
                if let (Some(condition), Some(current)) = (
                    httpdate::parse(header),
                    self.resource.last_modified(request).await?,
                ) {
                    return Ok(condition >= httpdate::truncate_to_seconds(current));
                }
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use http::header::HeaderMap;
    use http::Method;
    use peitho_core::HookResult;

    struct Tagged;

    impl Resource for Tagged {
        fn etag(&self, _request: &Request, _hint: Option<&str>) -> HookResult<'_, Option<String>> {
            Box::pin(async { Ok(Some("abc123".to_string())) })
        }

        fn last_modified(&self, _request: &Request) -> HookResult<'_, Option<DateTime<Utc>>> {
            Box::pin(async {
                Ok(Some(
                    Utc.with_ymd_and_hms(2014, 1, 1, 12, 0, 0).unwrap(),
                ))
            })
        }
    }

    fn request_with(name: http::header::HeaderName, value: &str) -> Request {
        let mut headers = HeaderMap::new();
        headers.insert(name, value.parse().unwrap());
        Request::new(Method::PUT, headers, bytes::Bytes::new())
    }

    #[test]
    fn entity_tag_parsing() {
        assert_eq!(parse_entity_tag("\"abc123\"").as_deref(), Some("abc123"));
        assert_eq!(parse_entity_tag("abc123").as_deref(), Some("abc123"));
        assert_eq!(parse_entity_tag("W/\"abc123\"").as_deref(), Some("abc123"));
        assert_eq!(parse_entity_tag("\"\""), None);
        assert_eq!(parse_entity_tag("  "), None);
    }

    #[test]
    fn required_when_the_relevant_header_is_missing() {
        let resource = Tagged;
        let tags_only = ConditionalEvaluator::new(&resource, true, false);
        assert!(tags_only.precondition_required(&Request::without_body(Method::PUT)));
        assert!(!tags_only.precondition_required(&request_with(IF_MATCH, "\"abc123\"")));

        let dates_only = ConditionalEvaluator::new(&resource, false, true);
        assert!(dates_only.precondition_required(&request_with(IF_MATCH, "\"abc123\"")));

        let neither = ConditionalEvaluator::new(&resource, false, false);
        assert!(!neither.precondition_required(&Request::without_body(Method::PUT)));
        assert!(!neither.enabled());
    }

    #[tokio::test]
    async fn matching_tag_passes_the_precondition() {
        let resource = Tagged;
        let evaluator = ConditionalEvaluator::new(&resource, true, false);
        let request = request_with(IF_MATCH, "\"abc123\"");
        assert!(!evaluator.precondition_failed(&request).await.unwrap());
    }

    #[tokio::test]
    async fn stale_tag_fails_the_precondition() {
        let resource = Tagged;
        let evaluator = ConditionalEvaluator::new(&resource, true, false);
        let request = request_with(IF_MATCH, "\"stale\"");
        assert!(evaluator.precondition_failed(&request).await.unwrap());
    }

    #[tokio::test]
    async fn if_match_verdict_is_final_over_dates() {
        let resource = Tagged;
        let evaluator = ConditionalEvaluator::new(&resource, true, true);
        let mut headers = HeaderMap::new();
        headers.insert(IF_MATCH, "\"abc123\"".parse().unwrap());
        // A date older than the entity would fail on its own, but the
        // matching tag already settled the outcome.
        headers.insert(
            IF_UNMODIFIED_SINCE,
            "Wed, 01 Jan 2014 11:00:00 GMT".parse().unwrap(),
        );
        let request = Request::new(Method::PUT, headers, bytes::Bytes::new());
        assert!(!evaluator.precondition_failed(&request).await.unwrap());
    }

    #[tokio::test]
    async fn modified_after_the_condition_date_fails() {
        let resource = Tagged;
        let evaluator = ConditionalEvaluator::new(&resource, false, true);
        let stale = request_with(IF_UNMODIFIED_SINCE, "Wed, 01 Jan 2014 11:00:00 GMT");
        assert!(evaluator.precondition_failed(&stale).await.unwrap());

        let exact = request_with(IF_UNMODIFIED_SINCE, "Wed, 01 Jan 2014 12:00:00 GMT");
        assert!(!evaluator.precondition_failed(&exact).await.unwrap());
    }

    #[tokio::test]
    async fn unparseable_condition_date_is_ignored() {
        let resource = Tagged;
        let evaluator = ConditionalEvaluator::new(&resource, false, true);
        let request = request_with(IF_UNMODIFIED_SINCE, "not a date");
        assert!(!evaluator.precondition_failed(&request).await.unwrap());
    }

    #[tokio::test]
    async fn current_tag_is_not_modified() {
        let resource = Tagged;
        let evaluator = ConditionalEvaluator::new(&resource, true, false);
        let request = request_with(IF_NONE_MATCH, "\"abc123\"");
        assert!(evaluator.not_modified(&request).await.unwrap());

        let request = request_with(IF_NONE_MATCH, "\"other\"");
        assert!(!evaluator.not_modified(&request).await.unwrap());
    }

    #[tokio::test]
    async fn if_modified_since_at_or_after_the_entity_is_not_modified() {
        let resource = Tagged;
        let evaluator = ConditionalEvaluator::new(&resource, false, true);

        let same = request_with(IF_MODIFIED_SINCE, "Wed, 01 Jan 2014 12:00:00 GMT");
        assert!(evaluator.not_modified(&same).await.unwrap());

        let later = request_with(IF_MODIFIED_SINCE, "Wed, 01 Jan 2014 13:00:00 GMT");
        assert!(evaluator.not_modified(&later).await.unwrap());

        let earlier = request_with(IF_MODIFIED_SINCE, "Wed, 01 Jan 2014 11:00:00 GMT");
        assert!(!evaluator.not_modified(&earlier).await.unwrap());
    }

    #[tokio::test]
    async fn resource_without_validators_never_matches() {
        let resource = peitho_core::DefaultResource;
        let evaluator = ConditionalEvaluator::new(&resource, true, true);
        let request = request_with(IF_NONE_MATCH, "\"abc123\"");
        assert!(!evaluator.not_modified(&request).await.unwrap());

        let request = request_with(IF_MATCH, "\"abc123\"");
        assert!(evaluator.precondition_failed(&request).await.unwrap());
    }
}
