//! Declarative resource descriptors.
//!
//! A [`ResourceDescriptor`] is the static half of a resource: which methods
//! it answers, which media types it speaks, its availability, throttling and
//! caching posture, and the handler for each method. Descriptors are built
//! once through [`DescriptorBuilder`], validated at build time, and shared
//! immutably across requests. The dynamic half, per-request questions like
//! authorization and entity existence, lives behind the
//! [`Resource`](peitho_core::Resource) hook trait.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{Method, StatusCode};
use peitho_core::{httpdate, method, BoxFuture, ConfigError, HookError, Response};
use serde_json::Value;

use crate::context::Exchange;
use crate::rate_limit::RateLimiter;

/// What a handler hands back to the pipeline.
///
/// Most handlers return [`Reply::Value`], letting the post-processor encode
/// the value in the negotiated media type. The other variants exist for
/// handlers that need to bypass encoding or control the response outright.
#[derive(Debug)]
pub enum Reply {
    /// A bodiless 204.
    NoContent,
    /// Pre-encoded body bytes, passed through untouched.
    Raw(Bytes),
    /// A structured value, encoded by the negotiated codec.
    Value(Value),
    /// A bare terminal status.
    Status(StatusCode),
    /// A fully-formed response the post-processor only normalizes.
    Response(Response),
}

/// A method handler: an async function over the negotiated exchange.
///
/// The returned future is `'static`, so a handler clones what it needs from
/// the exchange before going async.
pub type Handler =
    Arc<dyn Fn(&Exchange) -> BoxFuture<'static, Result<Reply, HookError>> + Send + Sync>;

/// Resource availability, the first gate of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unavailable {
    /// The resource is in service.
    #[default]
    No,
    /// Out of service with no estimate; 503 without `Retry-After`.
    Indefinite,
    /// Out of service for a known number of seconds.
    After(u64),
    /// Out of service until a known instant.
    Until(DateTime<Utc>),
}

impl Unavailable {
    /// Whether requests should be refused with 503.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::No)
    }

    /// The `Retry-After` value to advertise, when there is an estimate:
    /// delta-seconds for [`After`](Self::After), an HTTP-date for
    /// [`Until`](Self::Until).
    pub fn retry_after(&self) -> Option<String> {
        match self {
            Self::No | Self::Indefinite => None,
            Self::After(seconds) => Some(seconds.to_string()),
            Self::Until(instant) => Some(httpdate::format(*instant)),
        }
    }
}

/// Freshness lifetime for cacheable responses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxAge {
    /// Relative lifetime; zero or negative forces revalidation.
    Seconds(i64),
    /// Absolute expiry instant, advertised via `Expires`.
    Until(DateTime<Utc>),
}

/// Which caches may store the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    /// Any cache may store it.
    Public,
    /// Only the client's private cache may store it.
    Private,
}

/// Declarative cache directives applied to safe-method responses.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CachePolicy {
    /// Freshness lifetime, if declared.
    pub max_age: Option<MaxAge>,
    /// Cache scope, if declared.
    pub scope: Option<CacheScope>,
    /// Forbid storing the response anywhere.
    pub no_store: bool,
    /// Require revalidation once stale.
    pub must_revalidate: bool,
}

/// Builder for [`ResourceDescriptor`]. Invalid combinations are rejected by
/// [`build`](Self::build), never at request time.
pub struct DescriptorBuilder {
    handlers: HashMap<Method, Handler>,
    explicit_methods: Option<Vec<Method>>,
    accept_types: Vec<String>,
    content_types: Option<Vec<String>>,
    patch_types: Option<Vec<String>>,
    unavailable: Unavailable,
    rate_limit: Option<(u64, Duration)>,
    max_request_entity_length: Option<u64>,
    require_conditional_request: bool,
    use_etags: bool,
    use_last_modified: bool,
    cache_policy: CachePolicy,
}

impl Default for DescriptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorBuilder {
    /// Starts a descriptor with the default posture: JSON in and out, no
    /// validators, no throttling, always available.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            explicit_methods: None,
            accept_types: vec!["application/json".to_string()],
            content_types: None,
            patch_types: None,
            unavailable: Unavailable::No,
            rate_limit: None,
            max_request_entity_length: None,
            require_conditional_request: false,
            use_etags: false,
            use_last_modified: false,
            cache_policy: CachePolicy::default(),
        }
    }

    /// Registers the handler for a method. The allowed-method set is derived
    /// from registrations unless [`methods`](Self::methods) pins it.
    pub fn handler<F>(mut self, method: Method, handler: F) -> Self
    where
        F: Fn(&Exchange) -> BoxFuture<'static, Result<Reply, HookError>> + Send + Sync + 'static,
    {
        self.handlers.insert(method, Arc::new(handler));
        self
    }

    /// Pins the allowed-method set instead of deriving it. Every listed
    /// method other than `OPTIONS` and `HEAD` must have a handler.
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.explicit_methods = Some(methods.into_iter().collect());
        self
    }

    /// The media types the resource can encode responses in, highest
    /// priority first. Defaults to `application/json`.
    pub fn accept_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.accept_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// The media types accepted in request bodies. Defaults to the accept
    /// types.
    pub fn content_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.content_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// The media types advertised in `Accept-Patch`. Defaults to the content
    /// types.
    pub fn patch_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.patch_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Marks the resource out of service.
    pub fn unavailable(mut self, unavailable: Unavailable) -> Self {
        self.unavailable = unavailable;
        self
    }

    /// Throttles the resource to `count` requests per `window`.
    pub fn rate_limit(mut self, count: u64, window: Duration) -> Self {
        self.rate_limit = Some((count, window));
        self
    }

    /// Caps the request entity length in bytes; larger bodies answer 413.
    pub fn max_request_entity_length(mut self, bytes: u64) -> Self {
        self.max_request_entity_length = Some(bytes);
        self
    }

    /// Demands conditional headers on `PUT` and `PATCH`, answering 428 when
    /// they are missing.
    pub fn require_conditional_request(mut self, required: bool) -> Self {
        self.require_conditional_request = required;
        self
    }

    /// Enables or disables entity-tag validation. Off by default.
    pub fn use_etags(mut self, enabled: bool) -> Self {
        self.use_etags = enabled;
        self
    }

    /// Enables or disables last-modified validation. Off by default.
    pub fn use_last_modified(mut self, enabled: bool) -> Self {
        self.use_last_modified = enabled;
        self
    }

    /// Declares the cache directives for safe-method responses.
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Validates and freezes the descriptor.
    pub fn build(self) -> Result<ResourceDescriptor, ConfigError> {
        if let Some((count, window)) = self.rate_limit {
            if count == 0 || window.is_zero() {
                return Err(ConfigError::InvalidRateLimit);
            }
        }

        let mut allowed = match self.explicit_methods {
            Some(listed) => {
                let mut allowed = Vec::new();
                for method in listed {
                    if !method::is_known(&method) {
                        return Err(ConfigError::UnknownMethod { method });
                    }
                    if method != Method::OPTIONS
                        && method != Method::HEAD
                        && !self.handlers.contains_key(&method)
                    {
                        return Err(ConfigError::MissingHandler { method });
                    }
                    if !allowed.contains(&method) {
                        allowed.push(method);
                    }
                }
                allowed
            }
            None => {
                let mut allowed = Vec::new();
                for method in &method::KNOWN_METHODS {
                    // OPTIONS has a built-in answer; HEAD rides on GET.
                    let capable = if *method == Method::OPTIONS {
                        true
                    } else if *method == Method::HEAD {
                        self.handlers.contains_key(&Method::GET)
                    } else {
                        self.handlers.contains_key(method)
                    };
                    if capable {
                        allowed.push(method.clone());
                    }
                }
                allowed
            }
        };

        // HEAD is meaningless without GET.
        if !allowed.contains(&Method::GET) {
            allowed.retain(|m| *m != Method::HEAD);
        }
        if !allowed.contains(&Method::OPTIONS) {
            allowed.insert(0, Method::OPTIONS);
        }

        let accept_types = self.accept_types;
        let content_types = self.content_types.unwrap_or_else(|| accept_types.clone());
        let patch_types = self.patch_types.unwrap_or_else(|| content_types.clone());

        Ok(ResourceDescriptor {
            allowed_methods: allowed,
            handlers: self.handlers,
            accept_types,
            content_types,
            patch_types,
            unavailable: self.unavailable,
            rate_limiter: self
                .rate_limit
                .map(|(count, window)| RateLimiter::new(count, window)),
            max_request_entity_length: self.max_request_entity_length,
            require_conditional_request: self.require_conditional_request,
            use_etags: self.use_etags,
            use_last_modified: self.use_last_modified,
            cache_policy: self.cache_policy,
        })
    }
}

/// An immutable, validated resource configuration.
pub struct ResourceDescriptor {
    allowed_methods: Vec<Method>,
    handlers: HashMap<Method, Handler>,
    accept_types: Vec<String>,
    content_types: Vec<String>,
    patch_types: Vec<String>,
    unavailable: Unavailable,
    rate_limiter: Option<RateLimiter>,
    max_request_entity_length: Option<u64>,
    require_conditional_request: bool,
    use_etags: bool,
    use_last_modified: bool,
    cache_policy: CachePolicy,
}

impl std::fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("allowed_methods", &self.allowed_methods)
            .field("accept_types", &self.accept_types)
            .field("content_types", &self.content_types)
            .field("patch_types", &self.patch_types)
            .field("unavailable", &self.unavailable)
            .field("rate_limiter", &self.rate_limiter)
            .field("max_request_entity_length", &self.max_request_entity_length)
            .field(
                "require_conditional_request",
                &self.require_conditional_request,
            )
            .field("use_etags", &self.use_etags)
            .field("use_last_modified", &self.use_last_modified)
            .field("cache_policy", &self.cache_policy)
            .finish_non_exhaustive()
    }
}

impl ResourceDescriptor {
    /// Starts building a descriptor.
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::new()
    }

    /// The allowed methods, in canonical table order.
    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed_methods
    }

    /// Whether the method is allowed on this resource.
    pub fn allows(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    /// The `Allow` header value: allowed methods sorted lexically.
    pub fn allow_header(&self) -> String {
        let mut names: Vec<&str> = self.allowed_methods.iter().map(Method::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }

    /// The handler dispatched for a method. `HEAD` falls back to the `GET`
    /// handler; the pipeline strips the body afterwards.
    pub fn handler(&self, method: &Method) -> Option<&Handler> {
        match self.handlers.get(method) {
            Some(handler) => Some(handler),
            None if *method == Method::HEAD => self.handlers.get(&Method::GET),
            None => None,
        }
    }

    /// The handler registered for exactly this method, with no fallback.
    pub fn registered_handler(&self, method: &Method) -> Option<&Handler> {
        self.handlers.get(method)
    }

    /// Response media types, highest priority first.
    pub fn accept_types(&self) -> &[String] {
        &self.accept_types
    }

    /// Request body media types.
    pub fn content_types(&self) -> &[String] {
        &self.content_types
    }

    /// Media types advertised in `Accept-Patch`.
    pub fn patch_types(&self) -> &[String] {
        &self.patch_types
    }

    /// The availability state.
    pub fn unavailable(&self) -> Unavailable {
        self.unavailable
    }

    /// The throttle, when one is configured.
    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.rate_limiter.as_ref()
    }

    /// The request entity cap in bytes, when one is configured.
    pub fn max_request_entity_length(&self) -> Option<u64> {
        self.max_request_entity_length
    }

    /// Whether writes must carry conditional headers.
    pub fn require_conditional_request(&self) -> bool {
        self.require_conditional_request
    }

    /// Whether entity-tag validation is enabled.
    pub fn use_etags(&self) -> bool {
        self.use_etags
    }

    /// Whether last-modified validation is enabled.
    pub fn use_last_modified(&self) -> bool {
        self.use_last_modified
    }

    /// The declared cache directives.
    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peitho_core::ConfigError;

    fn noop() -> impl Fn(&Exchange) -> BoxFuture<'static, Result<Reply, HookError>> {
        |_| Box::pin(async { Ok(Reply::NoContent) })
    }

    #[test]
    fn default_descriptor_allows_only_options() {
        let descriptor = ResourceDescriptor::builder().build().unwrap();
        assert_eq!(descriptor.allowed_methods(), &[Method::OPTIONS]);
        assert_eq!(descriptor.allow_header(), "OPTIONS");
    }

    #[test]
    fn registering_get_implies_head() {
        let descriptor = ResourceDescriptor::builder()
            .handler(Method::GET, noop())
            .build()
            .unwrap();
        assert!(descriptor.allows(&Method::HEAD));
        assert_eq!(descriptor.allow_header(), "GET, HEAD, OPTIONS");
        assert!(descriptor.handler(&Method::HEAD).is_some());
        assert!(descriptor.registered_handler(&Method::HEAD).is_none());
    }

    #[test]
    fn head_is_never_allowed_without_get() {
        let descriptor = ResourceDescriptor::builder()
            .handler(Method::POST, noop())
            .methods([Method::POST, Method::HEAD])
            .build()
            .unwrap();
        assert!(!descriptor.allows(&Method::HEAD));
        assert!(descriptor.allows(&Method::POST));
    }

    #[test]
    fn options_is_always_allowed() {
        let descriptor = ResourceDescriptor::builder()
            .handler(Method::DELETE, noop())
            .methods([Method::DELETE])
            .build()
            .unwrap();
        assert!(descriptor.allows(&Method::OPTIONS));
    }

    #[test]
    fn explicit_method_without_handler_is_rejected() {
        let err = ResourceDescriptor::builder()
            .methods([Method::PUT])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingHandler { .. }));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = ResourceDescriptor::builder()
            .methods([Method::TRACE])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMethod { .. }));
    }

    #[test]
    fn zero_rate_limit_is_rejected() {
        let err = ResourceDescriptor::builder()
            .rate_limit(0, Duration::from_secs(1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRateLimit));
    }

    #[test]
    fn media_type_defaults_cascade() {
        let descriptor = ResourceDescriptor::builder().build().unwrap();
        assert_eq!(descriptor.accept_types(), &["application/json"]);
        assert_eq!(descriptor.content_types(), &["application/json"]);
        assert_eq!(descriptor.patch_types(), &["application/json"]);

        let descriptor = ResourceDescriptor::builder()
            .content_types(["application/xml"])
            .build()
            .unwrap();
        assert_eq!(descriptor.accept_types(), &["application/json"]);
        assert_eq!(descriptor.patch_types(), &["application/xml"]);
    }

    #[test]
    fn retry_after_rendering() {
        assert_eq!(Unavailable::No.retry_after(), None);
        assert_eq!(Unavailable::Indefinite.retry_after(), None);
        assert_eq!(Unavailable::After(120).retry_after().as_deref(), Some("120"));

        let instant = chrono::TimeZone::with_ymd_and_hms(&Utc, 1994, 11, 6, 8, 49, 37).unwrap();
        assert_eq!(
            Unavailable::Until(instant).retry_after().as_deref(),
            Some("Sun, 06 Nov 1994 08:49:37 GMT")
        );
    }

    #[test]
    fn allow_header_is_sorted_lexically() {
        let descriptor = ResourceDescriptor::builder()
            .handler(Method::GET, noop())
            .handler(Method::POST, noop())
            .handler(Method::DELETE, noop())
            .build()
            .unwrap();
        assert_eq!(descriptor.allow_header(), "DELETE, GET, HEAD, OPTIONS, POST");
    }
}
