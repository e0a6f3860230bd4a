//! Session token issuance and verification.
//!
//! Sessions are stateless bearer tokens: a signed claim set carrying the
//! user id and an expiry instant. The service holds the key pair built from
//! the provisioned secret and is constructed once at startup, then shared
//! with the router state and the request gate. There is no server-side token
//! registry and no revocation; a token dies by expiry or secret rotation.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::auth_body::AuthBody;
use crate::auth::jwt::JwtKeys;
use crate::auth::secret::SigningSecret;
use crate::prelude::*;

/// Fixed session lifetime.
pub const SESSION_DURATION: TimeDelta = TimeDelta::hours(24);

/// Token verification failures.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid Token")]
    InvalidToken,
    #[error("Token Missing")]
    TokenMissing,
    #[error("Token Expired")]
    TokenExpired,
    #[error("Token Expiry Missing")]
    MissingExpiry,
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidToken => Self::AuthInvalidToken,
            AuthError::TokenMissing => Self::AuthTokenMissing,
            AuthError::TokenExpired => Self::AuthTokenExpired,
            AuthError::MissingExpiry => Self::AuthExpiryMissing,
        }
    }
}

/// Claim set embedded in a session token.
///
/// Both fields are optional on the wire so verification can tell a missing
/// expiry apart from a bad signature instead of failing inside
/// deserialization.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl SessionClaims {
    fn new(user_id: Uuid, token_duration: TimeDelta) -> Result<Self> {
        let expiration = Utc::now()
            .checked_add_signed(token_duration)
            .ok_or(Error::AuthTokenCreation)?;

        Ok(Self {
            user_id: Some(user_id),
            exp: Some(expiration.timestamp()),
        })
    }
}

/// Token issuer/verifier handed to the router and the request gate.
#[derive(Clone)]
pub struct SessionService {
    keys: Arc<JwtKeys>,
}

impl SessionService {
    /// Builds the service from the provisioned signing secret.
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            keys: Arc::new(JwtKeys::new(secret.as_bytes())),
        }
    }

    /// Issues a token for `user_id` expiring [`SESSION_DURATION`] from now.
    pub fn issue(&self, user_id: Uuid) -> Result<AuthBody> {
        let claims = SessionClaims::new(user_id, SESSION_DURATION)?;
        let token = self.keys.jwt_encode(&claims).map_err(|err| {
            tracing::error!("Failed to encode session token {err}");
            err
        })?;
        Ok(AuthBody::new(token))
    }

    /// Verifies `token` and returns the embedded user id.
    ///
    /// Checks run in order: signature, expiry presence, expiry instant. The
    /// expiry comparison is strict; a token whose `exp` equals the current
    /// second is already expired.
    pub fn verify(&self, token: &str) -> core::result::Result<Uuid, AuthError> {
        let data = self
            .keys
            .jwt_decode::<SessionClaims>(token)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::Json(_) => AuthError::MissingExpiry,
                _ => AuthError::InvalidToken,
            })?;

        let claims = data.claims;
        let exp = claims.exp.ok_or(AuthError::MissingExpiry)?;
        if exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }
        claims.user_id.ok_or(AuthError::InvalidToken)
    }

    #[cfg(test)]
    fn issue_with_expiry(&self, user_id: Uuid, exp: i64) -> Result<String> {
        self.keys.jwt_encode(&SessionClaims {
            user_id: Some(user_id),
            exp: Some(exp),
        })
    }
}
