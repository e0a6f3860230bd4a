//! Main Crate Error

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    JWT(#[from] jsonwebtoken::errors::Error),

    #[error("PasswordHash {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error(transparent)]
    R2D2(#[from] diesel::r2d2::PoolError),

    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),

    #[error("Home directory not found")]
    HomeDirMissing,

    /* Registration Errors */
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Weak password")]
    WeakPassword,
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    /* Auth Errors */
    #[error("Auth Token Missing")]
    AuthTokenMissing,
    #[error("Auth Token Expired")]
    AuthTokenExpired,
    #[error("Invalid Token")]
    AuthInvalidToken,
    #[error("Token Expiry Missing")]
    AuthExpiryMissing,
    #[error("Auth Token Creation")]
    AuthTokenCreation,
    #[error("Wrong Credentials")]
    WrongCredentials,
    #[error("Missing Credentials")]
    MissingCredentials,

    #[error("Context Missing")]
    CtxMissing,
}
