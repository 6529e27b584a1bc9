//! Driving port for registration and login.
//!
//! Implemented in-process by [`crate::domain::CredentialService`] and, on the
//! gateway side, by the RPC client that forwards to the credential authority.
//! HTTP handlers depend only on this trait.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialAuthority: Send + Sync {
    /// Create an account. Raw inputs are trimmed and validated by the
    /// authority.
    async fn register(&self, username: &str, password: &str) -> Result<(), Error>;

    /// Exchange credentials for a signed access token.
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, Error>;

    /// Report whether the authority is able to serve requests.
    async fn check_liveness(&self) -> Result<(), Error>;
}
