//! Per-request state threaded through the pipeline.

use peitho_core::Request;
use serde_json::Value;

/// The state a request accumulates as it moves through the stages.
///
/// The request itself is immutable; what the stages add is the *negotiated*
/// view of it: the media type the response should be encoded in, the media
/// type the body was declared in, and the decoded body value. Handlers read
/// the exchange, never mutate it.
#[derive(Debug)]
pub struct Exchange {
    request: Request,
    accept_type: Option<String>,
    content_type: Option<String>,
    data: Option<Value>,
}

impl Exchange {
    /// Wraps a request with no negotiation performed yet.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            accept_type: None,
            content_type: None,
            data: None,
        }
    }

    /// The underlying request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The response media type settled by `Accept` negotiation, when the
    /// resource declared accept types.
    pub fn accept_type(&self) -> Option<&str> {
        self.accept_type.as_deref()
    }

    /// The request body's media type, matched against the supported list.
    /// `None` for bodiless requests.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The decoded request body, when a codec was registered for its
    /// media type.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub(crate) fn set_accept_type(&mut self, media_type: String) {
        self.accept_type = Some(media_type);
    }

    pub(crate) fn set_content_type(&mut self, media_type: String) {
        self.content_type = Some(media_type);
    }

    pub(crate) fn set_data(&mut self, data: Value) {
        self.data = Some(data);
    }
}
