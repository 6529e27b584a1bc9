//! PostgreSQL-backed `CallRepository` implementation using Diesel ORM.
//!
//! Update and delete are single statements filtered on both the call id and
//! the owner id; the affected-row count is the only ownership signal returned.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CallRepository, CallRepositoryError};
use crate::domain::{Call, CallId, CallStatus, NewCall, PhoneNumber, UserId};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{CallRow, NewCallRow};
use super::pool::{DbPool, PoolError};
use super::schema::calls;

/// Diesel-backed call store.
#[derive(Clone)]
pub struct DieselCallRepository {
    pool: DbPool,
}

impl DieselCallRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CallRepositoryError {
    CallRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: &diesel::result::Error, operation: &str) -> CallRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection => {
            CallRepositoryError::connection(DieselFailure::Connection.describe())
        }
        failure @ (DieselFailure::UniqueViolation | DieselFailure::Query) => {
            CallRepositoryError::query(failure.describe())
        }
    }
}

fn corrupted(err: impl std::fmt::Display) -> CallRepositoryError {
    CallRepositoryError::query(format!("corrupted call row: {err}"))
}

fn row_to_call(row: CallRow) -> Result<Call, CallRepositoryError> {
    Ok(Call {
        id: CallId::new(row.id).map_err(corrupted)?,
        owner: UserId::new(row.user_id).map_err(corrupted)?,
        client_name: row.client_name,
        phone_number: PhoneNumber::new(&row.phone_number).map_err(corrupted)?,
        description: row.description,
        status: row.status.parse::<CallStatus>().map_err(corrupted)?,
        created_at: row.created_at,
    })
}

fn rows_affected(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

#[async_trait]
impl CallRepository for DieselCallRepository {
    async fn insert(&self, call: &NewCall) -> Result<CallId, CallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCallRow {
            client_name: call.client_name(),
            phone_number: call.phone_number().as_ref(),
            description: call.description(),
            status: call.status().as_str(),
            user_id: call.owner().get(),
        };

        let id: i64 = diesel::insert_into(calls::table)
            .values(&row)
            .returning(calls::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "insert call"))?;

        CallId::new(id).map_err(corrupted)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Call>, CallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CallRow> = calls::table
            .filter(calls::user_id.eq(owner.get()))
            .order((calls::created_at.desc(), calls::id.desc()))
            .select(CallRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err, "list calls"))?;

        rows.into_iter().map(row_to_call).collect()
    }

    async fn find_by_id_and_owner(
        &self,
        id: CallId,
        owner: UserId,
    ) -> Result<Option<Call>, CallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CallRow> = calls::table
            .filter(calls::id.eq(id.get()))
            .filter(calls::user_id.eq(owner.get()))
            .select(CallRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "find call"))?;

        row.map(row_to_call).transpose()
    }

    async fn update_status(
        &self,
        id: CallId,
        owner: UserId,
        status: CallStatus,
    ) -> Result<u64, CallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count = diesel::update(
            calls::table
                .filter(calls::id.eq(id.get()))
                .filter(calls::user_id.eq(owner.get())),
        )
        .set(calls::status.eq(status.as_str()))
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(&err, "update call status"))?;

        Ok(rows_affected(count))
    }

    async fn delete(&self, id: CallId, owner: UserId) -> Result<u64, CallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count = diesel::delete(
            calls::table
                .filter(calls::id.eq(id.get()))
                .filter(calls::user_id.eq(owner.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(&err, "delete call"))?;

        Ok(rows_affected(count))
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(status: &str, phone: &str) -> CallRow {
        CallRow {
            id: 11,
            client_name: "Acme".to_owned(),
            phone_number: phone.to_owned(),
            description: "Leaking tap".to_owned(),
            status: status.to_owned(),
            created_at: Utc::now(),
            user_id: 4,
        }
    }

    #[rstest]
    fn valid_row_converts() {
        let call = row_to_call(row("закрыта", "+71234567890")).expect("valid row");
        assert_eq!(call.id.get(), 11);
        assert_eq!(call.owner.get(), 4);
        assert_eq!(call.status, CallStatus::Closed);
    }

    #[rstest]
    #[case(row("archived", "+71234567890"))]
    #[case(row("открыта", "not-a-phone"))]
    fn corrupted_rows_are_query_errors(#[case] input: CallRow) {
        let err = row_to_call(input).expect_err("corrupted row");
        assert!(matches!(err, CallRepositoryError::Query { .. }));
    }
}
