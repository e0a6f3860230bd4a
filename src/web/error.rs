//! Error to HTTP response mapping.

use crate::prelude::*;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            // Registration policy errors
            Error::InvalidEmailFormat => (StatusCode::BAD_REQUEST, "Invalid email format"),
            Error::WeakPassword => (
                StatusCode::BAD_REQUEST,
                "Password must be at least 8 characters and contain an uppercase letter, \
                 a lowercase letter, a number, and a special character",
            ),
            Error::EmailAlreadyRegistered => (StatusCode::BAD_REQUEST, "Email already registered"),

            // Auth-related errors
            Error::AuthTokenMissing => (StatusCode::UNAUTHORIZED, "Authentication required"),
            Error::AuthTokenExpired => (StatusCode::UNAUTHORIZED, "Authentication token expired"),
            Error::AuthInvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
            Error::AuthExpiryMissing => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
            Error::WrongCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            Error::MissingCredentials => (StatusCode::UNAUTHORIZED, "Missing credentials"),

            // Internal errors - hide details
            Error::AuthTokenCreation
            | Error::Generic(_)
            | Error::IO(_)
            | Error::JWT(_)
            | Error::PasswordHash(_)
            | Error::R2D2(_)
            | Error::Diesel(_)
            | Error::HomeDirMissing
            | Error::CtxMissing => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "status": status.as_u16()
            }
        }));
        (status, body).into_response()
    }
}
