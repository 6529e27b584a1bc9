//! Authentication primitives: validated credentials and access tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a service talks to a port.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{UserValidationError, Username};

/// Maximum password length in bytes. bcrypt ignores input past this point, so
/// longer passwords are rejected rather than silently truncated.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Reasons a username/password pair fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username and password must be provided")]
    EmptyUsername,
    /// Password was missing or blank once trimmed.
    #[error("username and password must be provided")]
    EmptyPassword,
    /// Username exceeds the length ceiling.
    #[error("username or password too long")]
    UsernameTooLong,
    /// Password exceeds the hash input ceiling.
    #[error("username or password too long")]
    PasswordTooLong,
}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::UsernameTooLong { .. } => Self::UsernameTooLong,
            UserValidationError::EmptyUsername | UserValidationError::NonPositiveId => {
                Self::EmptyUsername
            }
        }
    }
}

/// Validated credentials used by registration and login.
///
/// ## Invariants
/// - Both fields are trimmed and non-empty.
/// - `username` is at most 32 characters; `password` at most
///   [`PASSWORD_MAX_BYTES`] bytes.
/// - The password buffer is wiped on drop.
///
/// # Examples
/// ```
/// use calls_backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" alice ", " secret123 ").unwrap();
/// assert_eq!(creds.username().as_ref(), "alice");
/// assert_eq!(creds.password(), "secret123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Trim and validate raw inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let password = password.trim();
        if username.trim().is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        let username = Username::new(username)?;
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(CredentialsValidationError::PasswordTooLong);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Trimmed password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed bearer token handed to clients after login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Consume the wrapper and return the encoded token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}
