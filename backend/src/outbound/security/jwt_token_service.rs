//! HS256 identity tokens.
//!
//! One [`JwtTokenService`] implements both [`TokenIssuer`] and
//! [`TokenVerifier`]. Expiry is checked against an injected clock rather than
//! the library's wall-clock check, so tests can move time explicitly.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{
    TokenIssuer, TokenSigningError, TokenVerificationError, TokenVerifier,
};
use crate::domain::{AccessToken, UserId};

/// Default token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Signed token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id.
    pub id: i64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Construction failures for [`JwtTokenService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,
    #[error("token lifetime is out of range")]
    TtlOutOfRange,
}

/// HS256 token issuer and verifier over a shared secret.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service from the process signing secret.
    ///
    /// # Errors
    ///
    /// Rejects an empty secret and lifetimes that do not fit a timestamp.
    pub fn new(
        secret: &Zeroizing<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, JwtConfigError> {
        if secret.is_empty() {
            return Err(JwtConfigError::EmptySecret);
        }
        let ttl = TimeDelta::from_std(ttl).map_err(|_| JwtConfigError::TtlOutOfRange)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            clock,
        })
    }

    fn classify(error: &jsonwebtoken::errors::Error) -> TokenVerificationError {
        match error.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => TokenVerificationError::BadSignature,
            ErrorKind::ExpiredSignature => TokenVerificationError::Expired,
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                TokenVerificationError::BadClaims
            }
            _ => TokenVerificationError::Malformed,
        }
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user_id: UserId) -> Result<AccessToken, TokenSigningError> {
        let now = self.clock.utc();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenSigningError::signing("token expiry is out of range"))?;
        let claims = Claims {
            id: user_id.get(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(AccessToken::new)
            .map_err(|err| TokenSigningError::signing(err.to_string()))
    }
}

impl TokenVerifier for JwtTokenService {
    fn verify(&self, token: &str) -> Result<UserId, TokenVerificationError> {
        // Reject anything not declared HS256 before touching the signature.
        let header =
            jsonwebtoken::decode_header(token).map_err(|_| TokenVerificationError::Malformed)?;
        if header.alg != Algorithm::HS256 {
            return Err(TokenVerificationError::BadSignature);
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| Self::classify(&err))?;
        let claims = data.claims;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenVerificationError::Expired);
        }

        UserId::new(claims.id).map_err(|_| TokenVerificationError::BadClaims)
    }
}

#[cfg(test)]
#[path = "jwt_token_service_tests.rs"]
mod tests;
