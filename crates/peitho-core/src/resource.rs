//! The [`Resource`] hook trait.
//!
//! A resource implementation answers the questions the pipeline cannot
//! answer itself: is this caller authorized, does the entity exist, what is
//! its current tag or modification instant. Every hook has a permissive
//! default, so a resource only overrides what it cares about. The default
//! posture is the same as declaring no capabilities at all.
//!
//! Hooks are pure queries. They may suspend (a storage lookup behind the
//! `is_not_found` answer, say), so the async hooks return boxed futures; the
//! pipeline awaits each one before moving to the next stage. A hook that
//! fails returns `Err(HookError)` and the pipeline converts it into a
//! 500-class response rather than letting the fault propagate.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::error::HookError;
use crate::request::Request;

/// A boxed future, the return type of async hooks and handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of an async hook invocation.
pub type HookResult<'a, T> = BoxFuture<'a, Result<T, HookError>>;

/// External collaborator contract supplied by a resource implementation.
pub trait Resource: Send + Sync + 'static {
    /// Whether the request lacks authorization (401). Default: authorized.
    fn is_unauthorized(&self, _request: &Request) -> HookResult<'_, bool> {
        Box::pin(async { Ok(false) })
    }

    /// Whether the request is forbidden (403). Default: permitted.
    fn is_forbidden(&self, _request: &Request) -> HookResult<'_, bool> {
        Box::pin(async { Ok(false) })
    }

    /// Whether the entity does not exist (404). Default: exists.
    fn is_not_found(&self, _request: &Request) -> HookResult<'_, bool> {
        Box::pin(async { Ok(false) })
    }

    /// Whether the entity existed once but no longer does (410).
    /// Default: not gone.
    fn is_gone(&self, _request: &Request) -> HookResult<'_, bool> {
        Box::pin(async { Ok(false) })
    }

    /// The current entity tag, unquoted. `hint` is the tag the client sent
    /// in its conditional header, available so implementations can use it as
    /// a cache key instead of recomputing. Default: no tag.
    fn etag(&self, _request: &Request, _hint: Option<&str>) -> HookResult<'_, Option<String>> {
        Box::pin(async { Ok(None) })
    }

    /// The current last-modified instant of the entity. Default: unknown.
    fn last_modified(&self, _request: &Request) -> HookResult<'_, Option<DateTime<Utc>>> {
        Box::pin(async { Ok(None) })
    }

    /// Whether an `Accept-Language` value can be satisfied. Default: yes.
    fn accepts_language(&self, _value: &str) -> bool {
        true
    }

    /// Whether an `Accept-Charset` value can be satisfied. Default: yes.
    fn accepts_charset(&self, _value: &str) -> bool {
        true
    }

    /// Whether an `Accept-Encoding` value can be satisfied. Default: yes.
    fn accepts_encoding(&self, _value: &str) -> bool {
        true
    }

    /// Whether a request `Content-Encoding` can be decoded. Default: yes.
    fn supports_content_encoding(&self, _value: &str) -> bool {
        true
    }

    /// Whether a request `Content-Language` is accepted. Default: yes.
    fn supports_content_language(&self, _value: &str) -> bool {
        true
    }
}

/// A resource with every hook left at its permissive default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResource;

impl Resource for DefaultResource {}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    struct GuardedResource;

    impl Resource for GuardedResource {
        fn is_unauthorized(&self, request: &Request) -> HookResult<'_, bool> {
            let missing = request.headers().get("authorization").is_none();
            Box::pin(async move { Ok(missing) })
        }

        fn etag(&self, _request: &Request, _hint: Option<&str>) -> HookResult<'_, Option<String>> {
            Box::pin(async { Ok(Some("abc123".to_string())) })
        }
    }

    #[tokio::test]
    async fn defaults_are_permissive() {
        let resource = DefaultResource;
        let request = Request::without_body(Method::GET);
        assert!(!resource.is_unauthorized(&request).await.unwrap());
        assert!(!resource.is_forbidden(&request).await.unwrap());
        assert!(!resource.is_not_found(&request).await.unwrap());
        assert!(!resource.is_gone(&request).await.unwrap());
        assert_eq!(resource.etag(&request, None).await.unwrap(), None);
        assert_eq!(resource.last_modified(&request).await.unwrap(), None);
        assert!(resource.accepts_language("en"));
        assert!(resource.supports_content_encoding("gzip"));
    }

    #[tokio::test]
    async fn overridden_hooks_are_consulted() {
        let resource = GuardedResource;
        let request = Request::without_body(Method::GET);
        assert!(resource.is_unauthorized(&request).await.unwrap());
        assert_eq!(
            resource.etag(&request, None).await.unwrap().as_deref(),
            Some("abc123")
        );
    }
}
