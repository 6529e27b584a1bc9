//! Calls backend: a credential authority and an HTTP gateway.
//!
//! The authority registers users and issues HS256 tokens over an internal
//! JSON RPC. The gateway verifies those tokens and serves owner-scoped call
//! records. Both run through [`server::NetworkService`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod rpc;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
