//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`UserRepository`, `CallRepository`, `PasswordHasher`,
//! `TokenIssuer`, `TokenVerifier`) are implemented by outbound adapters.
//! Driving ports (`CredentialAuthority`, `CallsCommand`, `CallsQuery`) are
//! what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod call_repository;
mod calls_command;
mod calls_query;
mod credential_authority;
mod password_hasher;
mod token_authority;
mod user_repository;

#[cfg(test)]
pub use call_repository::MockCallRepository;
pub use call_repository::{CallRepository, CallRepositoryError};
#[cfg(test)]
pub use calls_command::MockCallsCommand;
pub use calls_command::{CallsCommand, CreateCallRequest};
#[cfg(test)]
pub use calls_query::MockCallsQuery;
pub use calls_query::CallsQuery;
#[cfg(test)]
pub use credential_authority::MockCredentialAuthority;
pub use credential_authority::CredentialAuthority;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_authority::{MockTokenIssuer, MockTokenVerifier};
pub use token_authority::{TokenIssuer, TokenSigningError, TokenVerificationError, TokenVerifier};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
