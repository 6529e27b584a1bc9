//! Driving port for call mutations.

use async_trait::async_trait;

use crate::domain::{CallId, Error, UserId};

/// Raw create request as received from an inbound adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCallRequest {
    pub client_name: String,
    pub phone_number: String,
    pub description: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallsCommand: Send + Sync {
    /// Create an open call owned by `owner`.
    async fn create(&self, owner: UserId, request: CreateCallRequest) -> Result<CallId, Error>;

    /// Change the status of an owned call. `status` must be `"открыта"` or
    /// `"закрыта"`.
    async fn update_status(&self, id: CallId, owner: UserId, status: &str) -> Result<(), Error>;

    /// Delete an owned call.
    async fn delete(&self, id: CallId, owner: UserId) -> Result<(), Error>;
}
