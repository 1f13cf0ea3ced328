//! The fixed HTTP method table.
//!
//! Peitho recognizes the seven methods a general-purpose resource can
//! meaningfully declare: `OPTIONS`, `HEAD`, `GET`, `POST`, `PUT`, `DELETE`
//! and `PATCH`. Each carries the safety, idempotency and cacheability
//! metadata defined by RFC 7231 (and RFC 5789 for `PATCH`), which the
//! pipeline consults when deciding which precondition checks apply.

use http::Method;

/// Safety, idempotency and cacheability metadata for a method token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodProperties {
    /// The method is defined to have no side effects.
    pub safe: bool,
    /// Repeated identical requests have the effect of a single request.
    pub idempotent: bool,
    /// Responses to this method are cacheable by default.
    pub cacheable: bool,
}

/// All methods a resource can declare, in canonical table order.
pub const KNOWN_METHODS: [Method; 7] = [
    Method::OPTIONS,
    Method::HEAD,
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// Returns the metadata for a method, or `None` for tokens outside the table.
pub fn properties(method: &Method) -> Option<MethodProperties> {
    let props = match *method {
        Method::GET | Method::HEAD => MethodProperties {
            safe: true,
            idempotent: true,
            cacheable: true,
        },
        Method::OPTIONS => MethodProperties {
            safe: true,
            idempotent: true,
            cacheable: false,
        },
        Method::PUT | Method::DELETE => MethodProperties {
            safe: false,
            idempotent: true,
            cacheable: false,
        },
        Method::POST | Method::PATCH => MethodProperties {
            safe: false,
            idempotent: false,
            cacheable: false,
        },
        _ => return None,
    };
    Some(props)
}

/// Returns true if the method is in the fixed table.
pub fn is_known(method: &Method) -> bool {
    properties(method).is_some()
}

/// Returns true for methods defined to have no side effects.
pub fn is_safe(method: &Method) -> bool {
    properties(method).is_some_and(|p| p.safe)
}
