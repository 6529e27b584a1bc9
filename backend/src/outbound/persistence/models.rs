//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{calls, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Insertable struct for creating user records; the id is assigned by the
/// sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the calls table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = calls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CallRow {
    pub id: i64,
    pub client_name: String,
    pub phone_number: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

/// Insertable struct for new calls; `created_at` defaults to `NOW()`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = calls)]
pub(crate) struct NewCallRow<'a> {
    pub client_name: &'a str,
    pub phone_number: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub user_id: i64,
}
