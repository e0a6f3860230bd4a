//! Registration and login flows.

use crate::auth::auth_body::AuthBody;
use crate::auth::password::{generate_password_hash, is_password_valid};
use crate::auth::session::SessionService;
use crate::auth::validation::{validate_email, validate_password};
use crate::db::connection::DbConnection;
use crate::prelude::*;
use crate::user::api::{UserApi, UserLoginRequest, UserRegisterRequest};
use crate::user::db::{User, UserCreate};

/// Registers a new user.
///
/// Policy checks run before the store is touched; an existing email short
/// circuits before any hashing happens. The concurrent-registration race is
/// absorbed by the unique-violation mapping in the store layer.
pub fn register_user(payload: &UserRegisterRequest, connection: &DbConnection) -> Result<UserApi> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    match User::fetch_by_email(&payload.email, connection) {
        Ok(_) => return Err(Error::EmailAlreadyRegistered),
        Err(Error::Diesel(diesel::result::Error::NotFound)) => {}
        Err(err) => return Err(err),
    }

    let hash = generate_password_hash(&payload.password)?;
    let user = UserCreate {
        email: payload.email.clone(),
        hash,
    }
    .save(connection)?;
    Ok(user.into())
}

/// Verifies credentials and issues a session token.
///
/// Unknown email and wrong password both come back as `WrongCredentials`;
/// the caller cannot distinguish them.
pub fn login_user(
    auth: &UserLoginRequest,
    connection: &DbConnection,
    sessions: &SessionService,
) -> Result<AuthBody> {
    if auth.password.is_empty() {
        return Err(Error::MissingCredentials);
    }
    let user = match User::fetch_by_email(&auth.email, connection) {
        Ok(user) => user,
        Err(Error::Diesel(diesel::result::Error::NotFound)) => {
            return Err(Error::WrongCredentials);
        }
        Err(err) => return Err(err),
    };
    if !is_password_valid(&auth.password, &user.hash)? {
        return Err(Error::WrongCredentials);
    }
    sessions.issue(user.id)
}
