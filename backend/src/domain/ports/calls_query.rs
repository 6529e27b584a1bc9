//! Driving port for call reads.

use async_trait::async_trait;

use crate::domain::{Call, CallId, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallsQuery: Send + Sync {
    /// Calls owned by `owner`, newest first.
    async fn list(&self, owner: UserId) -> Result<Vec<Call>, Error>;

    /// A single owned call; anything else is not found.
    async fn get(&self, id: CallId, owner: UserId) -> Result<Call, Error>;
}
