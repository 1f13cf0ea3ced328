//! Named status-code constants for the decision tree.
//!
//! The pipeline only ever produces codes from this subset. They are plain
//! aliases of [`http::StatusCode`] constants so call sites and tests can
//! assert by name rather than by magic number.

use http::StatusCode;

/// 200 OK.
pub const OK: StatusCode = StatusCode::OK;
/// 204 No Content.
pub const NO_CONTENT: StatusCode = StatusCode::NO_CONTENT;
/// 206 Partial Content.
pub const PARTIAL_CONTENT: StatusCode = StatusCode::PARTIAL_CONTENT;
/// 304 Not Modified.
pub const NOT_MODIFIED: StatusCode = StatusCode::NOT_MODIFIED;
/// 401 Unauthorized.
pub const UNAUTHORIZED: StatusCode = StatusCode::UNAUTHORIZED;
/// 403 Forbidden.
pub const FORBIDDEN: StatusCode = StatusCode::FORBIDDEN;
/// 404 Not Found.
pub const NOT_FOUND: StatusCode = StatusCode::NOT_FOUND;
/// 405 Method Not Allowed.
pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode::METHOD_NOT_ALLOWED;
/// 406 Not Acceptable.
pub const NOT_ACCEPTABLE: StatusCode = StatusCode::NOT_ACCEPTABLE;
/// 409 Conflict.
pub const CONFLICT: StatusCode = StatusCode::CONFLICT;
/// 410 Gone.
pub const GONE: StatusCode = StatusCode::GONE;
/// 412 Precondition Failed.
pub const PRECONDITION_FAILED: StatusCode = StatusCode::PRECONDITION_FAILED;
/// 413 Payload Too Large (request entity too large).
pub const REQUEST_ENTITY_TOO_LARGE: StatusCode = StatusCode::PAYLOAD_TOO_LARGE;
/// 415 Unsupported Media Type.
pub const UNSUPPORTED_MEDIA_TYPE: StatusCode = StatusCode::UNSUPPORTED_MEDIA_TYPE;
/// 416 Range Not Satisfiable.
pub const RANGE_NOT_SATISFIABLE: StatusCode = StatusCode::RANGE_NOT_SATISFIABLE;
/// 428 Precondition Required.
pub const PRECONDITION_REQUIRED: StatusCode = StatusCode::PRECONDITION_REQUIRED;
/// 429 Too Many Requests.
pub const TOO_MANY_REQUESTS: StatusCode = StatusCode::TOO_MANY_REQUESTS;
/// 500 Internal Server Error, used when a resource hook fails unexpectedly.
pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;
/// 503 Service Unavailable.
pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode::SERVICE_UNAVAILABLE;
