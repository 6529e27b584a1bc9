//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised while producing a password digest.
    pub enum PasswordHashError {
        /// The hashing primitive failed (entropy source, worker pool, ...).
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, adaptive password hashing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing digest for `password`.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against `digest`.
    ///
    /// Mismatches and unparseable digests both yield `false`.
    async fn verify(&self, password: &str, digest: &PasswordHash) -> bool;
}
