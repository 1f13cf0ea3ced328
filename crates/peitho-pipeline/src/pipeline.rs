//! The request pipeline state machine.
//!
//! A [`Pipeline`] binds a descriptor, a resource implementation and a codec
//! registry, and evaluates every request against the canonical decision
//! tree, strictly in this order:
//!
//! 1. service unavailable (503)
//! 2. unauthorized (401)
//! 3. forbidden (403)
//! 4. too many requests (429)
//! 5. `OPTIONS` dispatch (built-in)
//! 6. unsupported media type (415), then entity too large (413)
//! 7. method not allowed (405)
//! 8. not acceptable (406)
//! 9. not found (404)
//! 10. gone (410)
//! 11. precondition required (428)
//! 12. precondition failed (412)
//! 13. not modified (304)
//!
//! The first failing stage terminates the request with its status; a request
//! surviving all of them has its body decoded and is dispatched to the
//! method handler. Stages share no mutable state apart from the rate
//! limiter, so many requests can run concurrently against one pipeline.

use std::sync::Arc;

use http::header::{
    HeaderName, ACCEPT, ACCEPT_CHARSET, ACCEPT_ENCODING, ACCEPT_LANGUAGE, ALLOW, CACHE_CONTROL,
    CONTENT_ENCODING, CONTENT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE, PRAGMA, RETRY_AFTER,
};
use http::Method;
use peitho_core::{status, CodecRegistry, HookError, Request, Resource, Response};
use peitho_mime::{match_accept, match_content_type, AcceptOutcome};

use crate::conditional::ConditionalEvaluator;
use crate::context::Exchange;
use crate::descriptor::ResourceDescriptor;
use crate::rate_limit::Admission;

// Not among http's predefined header names.
const ACCEPT_PATCH: HeaderName = HeaderName::from_static("accept-patch");

/// The pipeline stages, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Descriptor marked out of service (503).
    ServiceUnavailable,
    /// Authorization hook (401).
    Unauthorized,
    /// Permission hook (403).
    Forbidden,
    /// Rate limiter (429).
    TooManyRequests,
    /// Built-in `OPTIONS` dispatch.
    Options,
    /// Request body media type (415).
    UnsupportedMediaType,
    /// Request body length cap (413).
    RequestEntityTooLarge,
    /// Method membership in the allowed set (405).
    MethodNotAllowed,
    /// `Accept*` negotiation (406).
    NotAcceptable,
    /// Existence hook (404).
    NotFound,
    /// Tombstone hook (410).
    Gone,
    /// Missing conditional headers on a write (428).
    PreconditionRequired,
    /// Failed conditional headers on a write (412).
    PreconditionFailed,
    /// Still-current cached representation (304).
    NotModified,
}

impl Stage {
    /// Every stage, in evaluation order.
    pub const ALL: [Self; 14] = [
        Self::ServiceUnavailable,
        Self::Unauthorized,
        Self::Forbidden,
        Self::TooManyRequests,
        Self::Options,
        Self::UnsupportedMediaType,
        Self::RequestEntityTooLarge,
        Self::MethodNotAllowed,
        Self::NotAcceptable,
        Self::NotFound,
        Self::Gone,
        Self::PreconditionRequired,
        Self::PreconditionFailed,
        Self::NotModified,
    ];

    /// A stable name for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "service_unavailable",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::TooManyRequests => "too_many_requests",
            Self::Options => "options",
            Self::UnsupportedMediaType => "unsupported_media_type",
            Self::RequestEntityTooLarge => "request_entity_too_large",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::NotAcceptable => "not_acceptable",
            Self::NotFound => "not_found",
            Self::Gone => "gone",
            Self::PreconditionRequired => "precondition_required",
            Self::PreconditionFailed => "precondition_failed",
            Self::NotModified => "not_modified",
        }
    }
}

/// What a stage evaluation decides.
enum Flow {
    Continue,
    Terminate(Response),
}

/// A descriptor, resource and codec registry bound together, ready to
/// answer requests.
pub struct Pipeline {
    pub(crate) descriptor: Arc<ResourceDescriptor>,
    pub(crate) resource: Arc<dyn Resource>,
    pub(crate) codecs: Arc<CodecRegistry>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("descriptor", &self.descriptor)
            .field("codecs", &self.codecs)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Binds a descriptor and resource with the default codec registry.
    pub fn new(descriptor: ResourceDescriptor, resource: impl Resource) -> Self {
        Self::with_codecs(descriptor, resource, CodecRegistry::with_defaults())
    }

    /// Binds a descriptor and resource with an explicit codec registry.
    pub fn with_codecs(
        descriptor: ResourceDescriptor,
        resource: impl Resource,
        codecs: CodecRegistry,
    ) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            resource: Arc::new(resource),
            codecs: Arc::new(codecs),
        }
    }

    /// The bound descriptor.
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Evaluates a request against the decision tree and produces its
    /// response. Never fails: hook faults become 500-class responses.
    pub async fn handle(&self, request: Request) -> Response {
        let mut cx = Exchange::new(request);
        for stage in Stage::ALL {
            match self.evaluate(stage, &mut cx).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Terminate(response)) => {
                    tracing::debug!(
                        stage = stage.name(),
                        status = ?response.status(),
                        "request short-circuited"
                    );
                    return response;
                }
                Err(err) => return Self::hook_failure(stage.name(), &err),
            }
        }

        if let Some(content_type) = cx.content_type().map(str::to_string) {
            if self.codecs.supports(&content_type) {
                match self.codecs.decode(&content_type, cx.request().body()) {
                    Ok(value) => cx.set_data(value),
                    Err(err) => {
                        let err = HookError::with_source("request body decoding failed", err);
                        return Self::hook_failure("decode", &err);
                    }
                }
            }
        }

        self.dispatch(&cx).await
    }

    #[allow(clippy::too_many_lines)]
    async fn evaluate(&self, stage: Stage, cx: &mut Exchange) -> Result<Flow, HookError> {
        let descriptor = &self.descriptor;
        let method = cx.request().method().clone();

        match stage {
            Stage::ServiceUnavailable => {
                if descriptor.unavailable().is_active() {
                    let mut response = Response::with_status(status::SERVICE_UNAVAILABLE);
                    if let Some(delay) = descriptor.unavailable().retry_after() {
                        response.insert(RETRY_AFTER, &delay);
                    }
                    return Ok(Flow::Terminate(response));
                }
            }
            Stage::Unauthorized => {
                if self.resource.is_unauthorized(cx.request()).await? {
                    return Ok(Flow::Terminate(Response::with_status(status::UNAUTHORIZED)));
                }
            }
            Stage::Forbidden => {
                if self.resource.is_forbidden(cx.request()).await? {
                    return Ok(Flow::Terminate(Response::with_status(status::FORBIDDEN)));
                }
            }
            Stage::TooManyRequests => {
                if let Some(limiter) = descriptor.rate_limiter() {
                    if let Admission::Limited { retry_after } = limiter.admit().await {
                        let mut response = Response::with_status(status::TOO_MANY_REQUESTS);
                        response.insert(RETRY_AFTER, &retry_after.as_secs().max(1).to_string());
                        return Ok(Flow::Terminate(response));
                    }
                }
            }
            Stage::Options => {
                if method == Method::OPTIONS && descriptor.allows(&Method::OPTIONS) {
                    return Ok(Flow::Terminate(self.options_response(cx).await?));
                }
            }
            Stage::UnsupportedMediaType => {
                if cx.request().has_body() {
                    let matched = cx
                        .request()
                        .header(&CONTENT_TYPE)
                        .and_then(|header| match_content_type(header, descriptor.content_types()));
                    let Some(media_type) = matched else {
                        return Ok(Flow::Terminate(Response::with_status(
                            status::UNSUPPORTED_MEDIA_TYPE,
                        )));
                    };
                    let encoding_ok = cx
                        .request()
                        .header(&CONTENT_ENCODING)
                        .map_or(true, |value| self.resource.supports_content_encoding(value));
                    let language_ok = cx
                        .request()
                        .header(&CONTENT_LANGUAGE)
                        .map_or(true, |value| self.resource.supports_content_language(value));
                    if !encoding_ok || !language_ok {
                        return Ok(Flow::Terminate(Response::with_status(
                            status::UNSUPPORTED_MEDIA_TYPE,
                        )));
                    }
                    cx.set_content_type(media_type);
                }
            }
            Stage::RequestEntityTooLarge => {
                if cx.request().has_body() {
                    if let Some(max) = descriptor.max_request_entity_length() {
                        if cx.request().content_length() > max {
                            return Ok(Flow::Terminate(Response::with_status(
                                status::REQUEST_ENTITY_TOO_LARGE,
                            )));
                        }
                    }
                }
            }
            Stage::MethodNotAllowed => {
                if !descriptor.allows(&method) {
                    let mut response = Response::with_status(status::METHOD_NOT_ALLOWED);
                    response.insert(ALLOW, &descriptor.allow_header());
                    return Ok(Flow::Terminate(response));
                }
            }
            Stage::NotAcceptable => {
                let outcome = match_accept(cx.request().header(&ACCEPT), descriptor.accept_types());
                match outcome {
                    AcceptOutcome::Media(media_type) => cx.set_accept_type(media_type),
                    AcceptOutcome::Any => {}
                    AcceptOutcome::Unacceptable => {
                        return Ok(Flow::Terminate(Response::with_status(
                            status::NOT_ACCEPTABLE,
                        )));
                    }
                }
                let language_ok = cx
                    .request()
                    .header(&ACCEPT_LANGUAGE)
                    .map_or(true, |value| self.resource.accepts_language(value));
                let charset_ok = cx
                    .request()
                    .header(&ACCEPT_CHARSET)
                    .map_or(true, |value| self.resource.accepts_charset(value));
                let encoding_ok = cx
                    .request()
                    .header(&ACCEPT_ENCODING)
                    .map_or(true, |value| self.resource.accepts_encoding(value));
                if !language_ok || !charset_ok || !encoding_ok {
                    return Ok(Flow::Terminate(Response::with_status(
                        status::NOT_ACCEPTABLE,
                    )));
                }
            }
            Stage::NotFound => {
                if self.resource.is_not_found(cx.request()).await? {
                    return Ok(Flow::Terminate(Response::with_status(status::NOT_FOUND)));
                }
            }
            Stage::Gone => {
                if self.resource.is_gone(cx.request()).await? {
                    return Ok(Flow::Terminate(Response::with_status(status::GONE)));
                }
            }
            Stage::PreconditionRequired => {
                if descriptor.require_conditional_request()
                    && (method == Method::PUT || method == Method::PATCH)
                    && self.conditional().precondition_required(cx.request())
                {
                    return Ok(Flow::Terminate(Response::uncacheable(
                        status::PRECONDITION_REQUIRED,
                    )));
                }
            }
            Stage::PreconditionFailed => {
                if (method == Method::PUT || method == Method::PATCH || method == Method::DELETE)
                    && self.conditional().enabled()
                    && self.conditional().precondition_failed(cx.request()).await?
                {
                    return Ok(Flow::Terminate(Response::uncacheable(
                        status::PRECONDITION_FAILED,
                    )));
                }
            }
            Stage::NotModified => {
                if (method == Method::GET || method == Method::HEAD)
                    && self.conditional().enabled()
                    && self.conditional().not_modified(cx.request()).await?
                {
                    return Ok(Flow::Terminate(Response::with_status(status::NOT_MODIFIED)));
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn conditional(&self) -> ConditionalEvaluator<'_> {
        ConditionalEvaluator::new(
            self.resource.as_ref(),
            self.descriptor.use_etags(),
            self.descriptor.use_last_modified(),
        )
    }

    /// The built-in `OPTIONS` answer: 204 with `Allow`, `Accept-Patch` when
    /// `PATCH` is allowed, forced non-cacheable. A registered `OPTIONS`
    /// handler replaces the 204 but keeps the headers.
    async fn options_response(&self, cx: &Exchange) -> Result<Response, HookError> {
        let mut response = match self.descriptor.registered_handler(&Method::OPTIONS) {
            Some(handler) => {
                let reply = handler(cx).await?;
                self.realize(cx, reply)?
            }
            None => Response::new(),
        };
        if response.status().is_none() {
            response.set_status(status::NO_CONTENT);
        }
        response.insert_if_unset(ALLOW, &self.descriptor.allow_header());
        if self.descriptor.allows(&Method::PATCH) {
            response.insert_if_unset(ACCEPT_PATCH, &self.descriptor.patch_types().join(", "));
        }
        if response.body().is_empty() {
            response.insert_if_unset(CONTENT_LENGTH, "0");
        }
        response.insert(CACHE_CONTROL, "no-cache");
        response.insert(PRAGMA, "no-cache");
        Ok(response)
    }

    async fn dispatch(&self, cx: &Exchange) -> Response {
        let method = cx.request().method();
        let Some(handler) = self.descriptor.handler(method) else {
            // No handler resolved; treat as not allowed.
            let mut response = Response::with_status(status::METHOD_NOT_ALLOWED);
            response.insert(ALLOW, &self.descriptor.allow_header());
            return response;
        };
        match handler(cx).await {
            Ok(reply) => match self.finalize(cx, reply).await {
                Ok(response) => response,
                Err(err) => Self::hook_failure("finalize", &err),
            },
            Err(err) => Self::hook_failure("handler", &err),
        }
    }

    /// Converts a hook fault into an opaque 500, recording the cause.
    pub(crate) fn hook_failure(stage: &str, err: &HookError) -> Response {
        tracing::error!(stage, error = %err, "hook failed");
        let body = serde_json::json!({
            "error": {
                "code": "internal",
                "message": "internal server error",
            }
        });
        let mut response = Response::with_status(status::INTERNAL_SERVER_ERROR);
        response.insert(CONTENT_TYPE, "application/json");
        response.set_body(bytes::Bytes::from(body.to_string()));
        response
    }
}
