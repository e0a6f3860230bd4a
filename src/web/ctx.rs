//! Per-request authentication context.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::prelude::*;

/// Identity bound to a request by the session gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctx {
    pub user_id: Uuid,
}

impl Ctx {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Raw bearer token, bound alongside [`Ctx`] for HTML callers so rendered
/// pages can embed it in follow-up API calls.
#[derive(Clone, Debug)]
pub struct SessionToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Ctx {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Ctx>()
            .cloned()
            .ok_or(Error::CtxMissing)
    }
}
