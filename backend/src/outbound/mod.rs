//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **security**: bcrypt password hashing and HS256 tokens
//! - **rpc**: the gateway's client for the credential authority
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
pub mod rpc;
pub mod security;
