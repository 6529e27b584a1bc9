//! User identity model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum username length, counted in characters after trimming.
pub const USERNAME_MAX: usize = 32;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The id was zero or negative.
    #[error("user id must be a positive integer")]
    NonPositiveId,
    /// The username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username exceeds [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
}

/// Store-assigned numeric user identifier.
///
/// # Examples
/// ```
/// use calls_backend::domain::UserId;
///
/// let id = UserId::new(7).unwrap();
/// assert_eq!(id.get(), 7);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i64) -> Result<Self, UserValidationError> {
        if raw <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value as stored.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique login name.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace.
/// - Non-empty and at most [`USERNAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Trim and validate a raw username.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Self-describing one-way password digest (algorithm, cost and salt
/// embedded). Never the raw password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest produced by a password hasher or read from the store.
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Registered account as held by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    password_hash: PasswordHash,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(id: UserId, username: Username, password_hash: PasswordHash) -> Self {
        Self {
            id,
            username,
            password_hash,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique login name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored password digest.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// Account awaiting insertion; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: PasswordHash,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn user_id_rejects_non_positive(#[case] raw: i64) {
        assert_eq!(UserId::new(raw), Err(UserValidationError::NonPositiveId));
    }

    #[rstest]
    #[case("  alice  ", "alice")]
    #[case("bob", "bob")]
    fn username_is_trimmed(#[case] raw: &str, #[case] expected: &str) {
        let name = Username::new(raw).expect("valid username");
        assert_eq!(name.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(" \t ")]
    fn username_rejects_blank(#[case] raw: &str) {
        assert_eq!(Username::new(raw), Err(UserValidationError::EmptyUsername));
    }

    #[rstest]
    fn username_length_is_counted_in_characters() {
        let at_limit = "ж".repeat(USERNAME_MAX);
        assert!(Username::new(&at_limit).is_ok());

        let over = "a".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(&over),
            Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$12$secretsecret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
