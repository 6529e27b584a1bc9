//! Ports for issuing and verifying identity tokens.
//!
//! The issuer lives in the credential authority; the verifier is used by the
//! gateway's bearer middleware. Both are constructed once at startup from the
//! shared signing secret.

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while signing a token.
    pub enum TokenSigningError {
        Signing { message: String } => "token signing failed: {message}",
    }
}

define_port_error! {
    /// Reasons a presented token is rejected.
    ///
    /// Callers treat every variant as "unauthenticated"; the variants exist so
    /// logs can tell them apart.
    pub enum TokenVerificationError {
        /// Not a structurally valid token.
        Malformed => "token is malformed",
        /// The expiry claim is in the past.
        Expired => "token has expired",
        /// Signature mismatch or unexpected algorithm.
        BadSignature => "token signature is invalid",
        /// Claims are missing or the identity claim is not a positive integer.
        BadClaims => "token claims are invalid",
    }
}

/// Signs identity tokens for a user.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: UserId) -> Result<AccessToken, TokenSigningError>;
}

/// Validates identity tokens and extracts the user id.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<UserId, TokenVerificationError>;
}
