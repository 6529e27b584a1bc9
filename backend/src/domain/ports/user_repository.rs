//! Port abstraction for credential-store adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username already registered: {username}",
    }
}

/// Credential store: users keyed by unique username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return the store-assigned id.
    ///
    /// Uniqueness is enforced by the store; a clash surfaces as
    /// [`UserRepositoryError::DuplicateUsername`].
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserRepositoryError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError>;
}
