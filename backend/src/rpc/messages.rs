//! Request and response bodies.

use serde::{Deserialize, Serialize};

use super::RpcCode;

/// Path prefix of every RPC route.
pub const RPC_SCOPE: &str = "/rpc/v1";
pub const REGISTER_PATH: &str = "/register";
pub const LOGIN_PATH: &str = "/login";
pub const HEALTH_PATH: &str = "/health";

/// Health status reported by a serving authority.
pub const SERVING: &str = "serving";

/// Body of `Register` and `Login` requests. Values are forwarded untrimmed;
/// the authority validates them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsMessage {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsMessage")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful `Register` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyMessage {}

/// Successful `Login` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMessage {
    pub token: String,
}

/// Liveness probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthMessage {
    pub status: String,
}

/// Failure body; the transport status mirrors `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorMessage {
    pub code: RpcCode,
    pub message: String,
}
