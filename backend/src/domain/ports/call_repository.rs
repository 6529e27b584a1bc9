//! Port for owner-scoped call persistence.
//!
//! Every read and mutation carries the owner id so adapters can fold the
//! ownership check into the statement itself. Callers never learn whether a
//! row exists under a different owner.

use async_trait::async_trait;

use crate::domain::{Call, CallId, CallStatus, NewCall, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by call repository adapters.
    pub enum CallRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "call repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "call repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallRepository: Send + Sync {
    /// Persist a new call and return its store-assigned id.
    async fn insert(&self, call: &NewCall) -> Result<CallId, CallRepositoryError>;

    /// All calls owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Call>, CallRepositoryError>;

    /// Fetch a call only when it belongs to `owner`.
    async fn find_by_id_and_owner(
        &self,
        id: CallId,
        owner: UserId,
    ) -> Result<Option<Call>, CallRepositoryError>;

    /// Set the status of a call owned by `owner`; returns rows affected.
    async fn update_status(
        &self,
        id: CallId,
        owner: UserId,
        status: CallStatus,
    ) -> Result<u64, CallRepositoryError>;

    /// Remove a call owned by `owner`; returns rows affected.
    async fn delete(&self, id: CallId, owner: UserId) -> Result<u64, CallRepositoryError>;
}
