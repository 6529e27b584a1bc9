//! bcrypt-backed `PasswordHasher`.
//!
//! bcrypt is deliberately slow, so both operations run on tokio's blocking
//! pool. The password copy handed to the worker is wiped when it drops.

use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Work factor used outside tests.
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Salted bcrypt hashing with a configurable cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl BcryptPasswordHasher {
    /// Hasher with an explicit work factor (4..=31). Tests use the minimum.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost))
            .await
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        Ok(PasswordHash::new(digest))
    }

    async fn verify(&self, password: &str, digest: &PasswordHash) -> bool {
        let password = Zeroizing::new(password.to_owned());
        let digest = digest.as_ref().to_owned();
        let outcome =
            tokio::task::spawn_blocking(move || bcrypt::verify(password.as_bytes(), &digest)).await;
        match outcome {
            Ok(Ok(matched)) => matched,
            Ok(Err(err)) => {
                debug!(error = %err, "stored digest could not be parsed");
                false
            }
            Err(err) => {
                debug!(error = %err, "password verification task failed");
                false
            }
        }
    }
}
