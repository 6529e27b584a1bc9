//! Inbound adapters that translate external requests into domain port calls
//! while keeping framework details at the edge.
//!
//! [`http`] serves the public gateway; [`rpc`] serves the credential
//! authority to the gateway.

pub mod http;
pub mod rpc;
