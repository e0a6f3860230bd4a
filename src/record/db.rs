//! Espresso brew record model.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::espresso_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EspressoRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub coffee: f64,
    pub water: f64,
    pub ratio: f64,
    pub beans_brand: String,
    pub grind_size: f64,
    pub taste_notes: String,
    /// Base64-encoded image or URL.
    pub picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::espresso_records)]
pub struct EspressoRecordCreate {
    pub user_id: Uuid,
    pub coffee: f64,
    pub water: f64,
    pub ratio: f64,
    pub beans_brand: String,
    pub grind_size: f64,
    pub taste_notes: String,
    pub picture: String,
}

impl EspressoRecord {
    /// Fetches records owned by `owner`, newest first, optionally capped.
    pub fn fetch_for_user(
        owner: &Uuid,
        limit: Option<i64>,
        connection: &DbConnection,
    ) -> Result<Vec<Self>> {
        use crate::schema::espresso_records::dsl::*;
        let conn = &mut connection.pool.get()?;
        let query = espresso_records
            .filter(user_id.eq(owner))
            .order(created_at.desc())
            .select(EspressoRecord::as_select());
        Ok(match limit {
            Some(count) => query.limit(count).load(conn)?,
            None => query.load(conn)?,
        })
    }
}

impl EspressoRecordCreate {
    pub fn save(self, connection: &DbConnection) -> Result<EspressoRecord> {
        use crate::schema::espresso_records::dsl::*;
        let conn = &mut connection.pool.get()?;
        Ok(diesel::insert_into(espresso_records)
            .values(&self)
            .returning(EspressoRecord::as_returning())
            .get_result(conn)?)
    }
}
