//! HTTP inbound adapter exposing the gateway's REST endpoints.

pub mod auth;
pub mod auth_routes;
pub mod calls;
pub mod error;
pub mod health;
pub mod state;
pub mod validation;

pub use error::ErrorBody;
