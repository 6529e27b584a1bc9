//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, PasswordHash, User, UserId, Username};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed credential store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

fn map_diesel_error(
    error: &diesel::result::Error,
    operation: &str,
    username: &Username,
) -> UserRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::UniqueViolation => {
            UserRepositoryError::duplicate_username(username.as_ref())
        }
        DieselFailure::Connection => {
            UserRepositoryError::connection(DieselFailure::Connection.describe())
        }
        DieselFailure::Query => UserRepositoryError::query(DieselFailure::Query.describe()),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let id = UserId::new(row.id).map_err(|err| {
        warn!(id = row.id, "stored user id is invalid");
        UserRepositoryError::query(format!("corrupted user row: {err}"))
    })?;
    let username = Username::new(&row.username)
        .map_err(|err| UserRepositoryError::query(format!("corrupted user row: {err}")))?;
    Ok(User::new(id, username, PasswordHash::new(row.password_hash)))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            username: user.username.as_ref(),
            password_hash: user.password_hash.as_ref(),
        };

        let id: i64 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "insert user", &user.username))?;

        UserId::new(id).map_err(|err| UserRepositoryError::query(err.to_string()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "find user by username", username))?;

        row.map(row_to_user).transpose()
    }
}
