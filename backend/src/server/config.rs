//! Process settings for both services, loaded via OrthoConfig.
//!
//! Values layer environment variables (`AUTH_*` / `GATEWAY_*`) under CLI
//! flags. Optional fields fall back to defaults through accessor methods;
//! required ones surface [`ConfigError::Missing`] so startup can fail with
//! context.

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_AUTH_PORT: u16 = 50051;
const DEFAULT_GATEWAY_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 5;
const DEFAULT_AUTH_SERVICE_URL: &str = "http://127.0.0.1:50051";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Length of the secret fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// A required setting is absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {key}")]
    Missing { key: &'static str },
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { key })
}

fn signing_secret(value: Option<&str>, key: &'static str) -> Result<Zeroizing<String>, ConfigError> {
    required(value, key).map(|secret| Zeroizing::new(secret.to_owned()))
}

/// Truncated SHA-256 fingerprint of the signing secret.
///
/// Returns the first 8 bytes of the digest as 16 lowercase hex characters, so
/// operators can confirm both services share a secret without logging it.
///
/// # Examples
///
/// ```rust
/// use calls_backend::server::secret_fingerprint;
///
/// let fp = secret_fingerprint("s3cr3t");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Settings for the credential authority.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AUTH")]
pub struct AuthServiceSettings {
    /// Port for the internal RPC listener.
    pub port: Option<u16>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// HS256 signing secret shared with the gateway.
    pub jwt_secret: Option<String>,
    /// Issued token lifetime in seconds.
    pub token_ttl_secs: Option<u64>,
    /// Drain budget on shutdown, in seconds.
    pub shutdown_timeout_secs: Option<u64>,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl AuthServiceSettings {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_AUTH_PORT)
    }

    /// Pool configuration for the user store.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when no database URL is configured.
    pub fn pool_config(&self) -> Result<PoolConfig, ConfigError> {
        let url = required(self.database_url.as_deref(), "AUTH_DATABASE_URL")?;
        Ok(PoolConfig::new(url).with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)))
    }

    /// The signing secret, wrapped so it is wiped on drop.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when the secret is absent or blank.
    pub fn jwt_secret(&self) -> Result<Zeroizing<String>, ConfigError> {
        signing_secret(self.jwt_secret.as_deref(), "AUTH_JWT_SECRET")
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(
            self.shutdown_timeout_secs
                .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        )
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

impl fmt::Debug for AuthServiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthServiceSettings")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("pool_max_size", &self.pool_max_size)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("shutdown_timeout_secs", &self.shutdown_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Settings for the public HTTP gateway.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GATEWAY")]
pub struct GatewaySettings {
    /// Port for the public HTTP listener.
    pub port: Option<u16>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// HS256 secret; must match the credential authority's.
    pub jwt_secret: Option<String>,
    /// Base URL of the credential authority.
    pub auth_service_url: Option<String>,
    /// Per-call timeout for RPC requests, in seconds.
    pub rpc_timeout_secs: Option<u64>,
    /// Drain budget on shutdown, in seconds.
    pub shutdown_timeout_secs: Option<u64>,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl GatewaySettings {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_GATEWAY_PORT)
    }

    /// Pool configuration for the call store.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when no database URL is configured.
    pub fn pool_config(&self) -> Result<PoolConfig, ConfigError> {
        let url = required(self.database_url.as_deref(), "GATEWAY_DATABASE_URL")?;
        Ok(PoolConfig::new(url).with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)))
    }

    /// The verification secret, wrapped so it is wiped on drop.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when the secret is absent or blank.
    pub fn jwt_secret(&self) -> Result<Zeroizing<String>, ConfigError> {
        signing_secret(self.jwt_secret.as_deref(), "GATEWAY_JWT_SECRET")
    }

    pub fn auth_service_url(&self) -> &str {
        self.auth_service_url
            .as_deref()
            .unwrap_or(DEFAULT_AUTH_SERVICE_URL)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs.unwrap_or(DEFAULT_RPC_TIMEOUT_SECS))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(
            self.shutdown_timeout_secs
                .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        )
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

impl fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("pool_max_size", &self.pool_max_size)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("auth_service_url", &self.auth_service_url)
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .field("shutdown_timeout_secs", &self.shutdown_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
