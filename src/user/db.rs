//! User identity model.
//!
//! Users are keyed by unique email. Rows are created by registration and
//! never updated or deleted afterwards; issued tokens reference the row id.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC hash string. Never serialized outward.
    pub hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct UserCreate {
    pub email: String,
    pub hash: String,
}

impl User {
    /// Looks up a user by exact (case-sensitive) email.
    ///
    /// Absence surfaces as `Error::Diesel(NotFound)`.
    pub fn fetch_by_email(target: &str, connection: &DbConnection) -> Result<Self> {
        use crate::schema::users::dsl::*;
        let conn = &mut connection.pool.get()?;
        Ok(users
            .filter(email.eq(target))
            .select(User::as_select())
            .get_result(conn)?)
    }
}

impl UserCreate {
    /// Inserts the row, mapping a unique-constraint race on email to
    /// [`Error::EmailAlreadyRegistered`].
    pub fn save(self, connection: &DbConnection) -> Result<User> {
        use crate::schema::users::dsl::*;
        let conn = &mut connection.pool.get()?;
        diesel::insert_into(users)
            .values(&self)
            .returning(User::as_returning())
            .get_result(conn)
            .map_err(map_insert_error)
    }
}

fn map_insert_error(err: diesel::result::Error) -> Error {
    match err {
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ) => Error::EmailAlreadyRegistered,
        err => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_maps_to_already_registered() {
        let err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new(String::from("duplicate key value violates unique constraint")),
        );
        assert!(matches!(
            map_insert_error(err),
            Error::EmailAlreadyRegistered
        ));
    }

    #[test]
    fn other_errors_pass_through() {
        let err = diesel::result::Error::NotFound;
        assert!(matches!(
            map_insert_error(err),
            Error::Diesel(diesel::result::Error::NotFound)
        ));
    }
}
