//! Response post-processing after a successful handler invocation.
//!
//! Realizes whatever the handler returned into a response, then normalizes
//! it: cache directives and validators on safe-method responses, body
//! stripping on `HEAD`, and a 200 default for handlers that set no status.

use bytes::Bytes;
use chrono::Utc;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, EXPIRES, LAST_MODIFIED};
use http::Method;
use peitho_core::{httpdate, status, HookError, Response};
use sha1::{Digest, Sha1};

use crate::context::Exchange;
use crate::descriptor::{CachePolicy, CacheScope, MaxAge, Reply};
use crate::pipeline::Pipeline;

impl Pipeline {
    /// Realizes and normalizes a handler's reply.
    pub(crate) async fn finalize(&self, cx: &Exchange, reply: Reply) -> Result<Response, HookError> {
        let mut response = self.realize(cx, reply)?;
        let method = cx.request().method();

        if *method == Method::GET || *method == Method::HEAD {
            apply_cache_policy(self.descriptor.cache_policy(), &mut response);

            if self.descriptor.use_etags() && response.header(&ETAG).is_none() {
                let tag = match self.resource.etag(cx.request(), None).await? {
                    Some(tag) => tag,
                    None => body_digest(response.body()),
                };
                response.insert(ETAG, &format!("\"{tag}\""));
            }
            if self.descriptor.use_last_modified() && response.header(&LAST_MODIFIED).is_none() {
                let instant = self
                    .resource
                    .last_modified(cx.request())
                    .await?
                    .unwrap_or_else(Utc::now);
                let instant = httpdate::truncate_to_seconds(instant);
                response.insert(LAST_MODIFIED, &httpdate::format(instant));
            }
        }

        if *method == Method::HEAD {
            // Advertise the length of the representation the body stood for.
            let length = response.body().len().to_string();
            response.insert_if_unset(CONTENT_LENGTH, &length);
            response.set_body(Bytes::new());
        }

        if response.status().is_none() {
            response.set_status(status::OK);
        }
        Ok(response)
    }

    /// Turns a [`Reply`] into a response accumulator. Structured values are
    /// encoded in the negotiated media type.
    pub(crate) fn realize(&self, cx: &Exchange, reply: Reply) -> Result<Response, HookError> {
        match reply {
            Reply::Response(response) => Ok(response),
            Reply::Status(code) => Ok(Response::with_status(code)),
            Reply::NoContent => Ok(Response::with_status(status::NO_CONTENT)),
            Reply::Raw(bytes) => {
                let mut response = Response::new();
                response.set_body(bytes);
                Ok(response)
            }
            Reply::Value(value) => {
                let media_type = cx
                    .accept_type()
                    .map(str::to_string)
                    .or_else(|| self.descriptor.accept_types().first().cloned())
                    .ok_or_else(|| {
                        HookError::new("structured reply with no media type to encode in")
                    })?;
                let body = self
                    .codecs
                    .encode(&media_type, &value)
                    .map_err(|err| HookError::with_source("response body encoding failed", err))?;
                let mut response = Response::new();
                response.insert(CONTENT_TYPE, &media_type);
                response.set_body(body);
                Ok(response)
            }
        }
    }
}

/// Renders the declared cache directives onto a response, without
/// clobbering anything the handler already set.
fn apply_cache_policy(policy: CachePolicy, response: &mut Response) {
    let mut directives: Vec<String> = Vec::new();
    match policy.scope {
        Some(CacheScope::Public) => directives.push("public".to_string()),
        Some(CacheScope::Private) => directives.push("private".to_string()),
        None => {}
    }
    match policy.max_age {
        Some(MaxAge::Seconds(seconds)) if seconds > 0 => {
            directives.push(format!("max-age={seconds}"));
        }
        Some(MaxAge::Seconds(_)) => {
            directives.push("no-cache".to_string());
            directives.push("max-age=0".to_string());
        }
        Some(MaxAge::Until(instant)) => {
            response.insert_if_unset(EXPIRES, &httpdate::format(instant));
        }
        None => {}
    }
    if policy.no_store {
        directives.push("no-store".to_string());
    }
    if policy.must_revalidate {
        directives.push("must-revalidate".to_string());
    }
    if !directives.is_empty() {
        response.insert_if_unset(http::header::CACHE_CONTROL, &directives.join(", "));
    }
}

/// Hex SHA-1 of the realized body, the fallback entity tag when the
/// resource supplies none.
fn body_digest(body: &[u8]) -> String {
    use std::fmt::Write;

    let digest = Sha1::digest(body);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}
