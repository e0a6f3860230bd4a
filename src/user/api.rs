//! User-facing request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::auth_body::AuthBody;

use super::db::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserApi {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserRegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserLoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserLogin {
    pub success: bool,
    pub token: String,
    pub message: String,
}

impl From<User> for UserApi {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            created_at: value.created_at,
        }
    }
}

impl From<AuthBody> for UserLogin {
    fn from(value: AuthBody) -> Self {
        Self {
            success: true,
            token: value.access_token,
            message: String::from("Login successful"),
        }
    }
}
