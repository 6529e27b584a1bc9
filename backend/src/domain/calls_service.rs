//! Ownership-scoped call services.
//!
//! Every operation takes the authenticated owner id explicitly and passes it
//! down to the repository. A call owned by someone else is reported exactly
//! like a call that does not exist.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::ports::{
    CallRepository, CallRepositoryError, CallsCommand, CallsQuery, CreateCallRequest,
};
use crate::domain::{Call, CallId, CallStatus, CallValidationError, Error, NewCall, UserId};

const CALL_NOT_FOUND: &str = "call not found";

fn map_repository_error(error: CallRepositoryError) -> Error {
    error!(error = %error, "call repository failure");
    Error::internal("call store unavailable")
}

fn map_validation_error(error: CallValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn not_found_unless_affected(rows: u64) -> Result<(), Error> {
    if rows == 0 {
        return Err(Error::not_found(CALL_NOT_FOUND));
    }
    Ok(())
}

/// Call service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CallsService<R> {
    calls_repo: Arc<R>,
}

impl<R> CallsService<R> {
    /// Create a service backed by `calls_repo`.
    pub fn new(calls_repo: Arc<R>) -> Self {
        Self { calls_repo }
    }
}

#[async_trait]
impl<R> CallsCommand for CallsService<R>
where
    R: CallRepository,
{
    async fn create(&self, owner: UserId, request: CreateCallRequest) -> Result<CallId, Error> {
        let call = NewCall::try_new(
            owner,
            &request.client_name,
            &request.phone_number,
            &request.description,
        )
        .map_err(map_validation_error)?;

        self.calls_repo
            .insert(&call)
            .await
            .map_err(map_repository_error)
    }

    async fn update_status(&self, id: CallId, owner: UserId, status: &str) -> Result<(), Error> {
        let status: CallStatus = status.parse().map_err(map_validation_error)?;

        let rows = self
            .calls_repo
            .update_status(id, owner, status)
            .await
            .map_err(map_repository_error)?;
        not_found_unless_affected(rows)
    }

    async fn delete(&self, id: CallId, owner: UserId) -> Result<(), Error> {
        let rows = self
            .calls_repo
            .delete(id, owner)
            .await
            .map_err(map_repository_error)?;
        not_found_unless_affected(rows)
    }
}

#[async_trait]
impl<R> CallsQuery for CallsService<R>
where
    R: CallRepository,
{
    async fn list(&self, owner: UserId) -> Result<Vec<Call>, Error> {
        self.calls_repo
            .list_by_owner(owner)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, id: CallId, owner: UserId) -> Result<Call, Error> {
        self.calls_repo
            .find_by_id_and_owner(id, owner)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(CALL_NOT_FOUND))
    }
}

#[cfg(test)]
#[path = "calls_service_tests.rs"]
mod tests;
