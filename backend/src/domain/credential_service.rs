//! Credential service: registration and login.
//!
//! Implements the [`CredentialAuthority`] driving port on top of the user
//! repository, password hasher and token issuer. Unknown usernames and wrong
//! passwords collapse into one unauthenticated error, and both paths perform
//! a password verification so their cost is comparable.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::domain::ports::{
    CredentialAuthority, PasswordHashError, PasswordHasher, TokenIssuer, UserRepository,
    UserRepositoryError,
};
use crate::domain::{AccessToken, Credentials, Error, NewUser, PasswordHash};

/// Message shared by every failed login.
pub const INVALID_LOGIN_MESSAGE: &str = "invalid username or password";

/// Input hashed once to obtain a digest for unknown-user verification.
const DUMMY_PASSWORD: &str = "dummy-password-for-timing-equalisation";

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateUsername { .. } => Error::conflict("user already exists"),
        UserRepositoryError::Connection { message } | UserRepositoryError::Query { message } => {
            error!(%message, "user repository failure");
            Error::internal("user store unavailable")
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal("failed to process password")
}

fn parse_credentials(username: &str, password: &str) -> Result<Credentials, Error> {
    Credentials::try_from_parts(username, password)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

/// Registration and login orchestration.
pub struct CredentialService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    issuer: Arc<T>,
    dummy_digest: OnceCell<PasswordHash>,
}

impl<U, H, T> CredentialService<U, H, T> {
    /// Create a service over its three collaborators.
    pub fn new(users: Arc<U>, hasher: Arc<H>, issuer: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            issuer,
            dummy_digest: OnceCell::new(),
        }
    }
}

impl<U, H, T> CredentialService<U, H, T>
where
    H: PasswordHasher,
{
    /// Burn one verification for a username that does not exist.
    async fn verify_against_dummy(&self, password: &str) {
        let digest = self
            .dummy_digest
            .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))
            .await;
        match digest {
            Ok(digest) => {
                let _matched = self.hasher.verify(password, digest).await;
            }
            Err(err) => error!(error = %err, "failed to prepare dummy password digest"),
        }
    }
}

#[async_trait]
impl<U, H, T> CredentialAuthority for CredentialService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    async fn register(&self, username: &str, password: &str) -> Result<(), Error> {
        let credentials = parse_credentials(username, password)?;

        let password_hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;

        let new_user = NewUser {
            username: credentials.username().clone(),
            password_hash,
        };
        let id = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_repository_error)?;

        info!(username = %credentials.username(), user_id = %id, "user registered");
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, Error> {
        let credentials = parse_credentials(username, password)?;

        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?;

        let Some(user) = user else {
            self.verify_against_dummy(credentials.password()).await;
            return Err(Error::unauthorized(INVALID_LOGIN_MESSAGE));
        };

        if !self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
        {
            return Err(Error::unauthorized(INVALID_LOGIN_MESSAGE));
        }

        let token = self.issuer.issue(user.id()).map_err(|err| {
            error!(error = %err, user_id = %user.id(), "token signing failed");
            Error::internal("failed to issue token")
        })?;

        info!(username = %credentials.username(), user_id = %user.id(), "user logged in");
        Ok(token)
    }

    async fn check_liveness(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
