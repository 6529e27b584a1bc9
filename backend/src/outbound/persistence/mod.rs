//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the credential-store and call-store ports,
//! backed by PostgreSQL via `diesel-async` and a `bb8` pool.
//!
//! - Repositories only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and the schema (`schema.rs`) stay private.
//! - Database failures are classified once and mapped to port errors; their
//!   detail is logged, not returned.
//!
//! # Example
//!
//! ```ignore
//! use calls_backend::outbound::persistence::{DbPool, DieselCallRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/calls")).await?;
//! let calls = DieselCallRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_call_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_call_repository::DieselCallRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
