//! RPC adapter exposing the credential authority.
//!
//! Routes are mounted under [`crate::rpc::RPC_SCOPE`] by
//! [`configure`]; handlers depend only on the
//! [`CredentialAuthority`](crate::domain::ports::CredentialAuthority) port.

mod error;
mod handlers;

pub use error::RpcError;
pub use handlers::{RpcState, configure};
