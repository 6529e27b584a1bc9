//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities used by the inbound and outbound
//! adapters, plus the two domain services. Types are immutable once
//! constructed and validate their invariants in their constructors.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TraceId: request correlation identifier.
//! - User, UserId, Username, PasswordHash, Credentials, AccessToken: identity.
//! - Call, CallId, CallStatus, PhoneNumber, NewCall: call records.
//! - CredentialService, CallsService: use-case orchestration.

pub mod auth;
pub mod call;
pub mod calls_service;
pub mod credential_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{AccessToken, Credentials, CredentialsValidationError, PASSWORD_MAX_BYTES};
pub use self::call::{
    Call, CallId, CallStatus, CallValidationError, NewCall, PhoneNumber, STATUS_CLOSED, STATUS_OPEN,
};
pub use self::calls_service::CallsService;
pub use self::credential_service::{CredentialService, INVALID_LOGIN_MESSAGE};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, PasswordHash, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use calls_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("call not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
