//! Wire contract between the gateway and the credential authority.
//!
//! JSON over HTTP/1.1. Both the server in [`crate::inbound::rpc`] and the
//! client in [`crate::outbound::rpc`] depend on these types only.

mod messages;
mod status;

pub use messages::{
    CredentialsMessage, EmptyMessage, HEALTH_PATH, HealthMessage, LOGIN_PATH, REGISTER_PATH,
    RPC_SCOPE, RpcErrorMessage, SERVING, TokenMessage,
};
pub use status::RpcCode;
