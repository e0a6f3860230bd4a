//! Accept-header content negotiation.
//!
//! The gate answers an unauthenticated browser with a redirect to the login
//! page and an unauthenticated API caller with a JSON 401. The branch is a
//! UX affordance, not a security boundary, and hinges on a plain prefix
//! match of the `Accept` value.

/// How a rejection should be rendered for this caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Html,
    Api,
}

/// Classifies a caller by its `Accept` header value.
pub fn negotiate(accept: Option<&str>) -> ResponseMode {
    match accept {
        Some(value) if value.starts_with("text/html") => ResponseMode::Html,
        _ => ResponseMode::Api,
    }
}
