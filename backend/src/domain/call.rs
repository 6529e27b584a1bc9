//! Call records: ticket-like entries owned by a single user.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::UserId;

/// Validation errors returned by the call constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallValidationError {
    #[error("call id must be a positive integer")]
    NonPositiveId,
    #[error("client_name must not be empty")]
    EmptyClientName,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("invalid phone number format")]
    InvalidPhoneNumber,
    #[error("status must be 'открыта' or 'закрыта'")]
    InvalidStatus,
}

/// Store-assigned numeric call identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CallId(i64);

impl CallId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: i64) -> Result<Self, CallValidationError> {
        if raw <= 0 {
            return Err(CallValidationError::NonPositiveId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for CallId {
    type Error = CallValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CallId> for i64 {
    fn from(value: CallId) -> Self {
        value.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Wire and storage literal for an open call.
pub const STATUS_OPEN: &str = "открыта";
/// Wire and storage literal for a closed call.
pub const STATUS_CLOSED: &str = "закрыта";

/// Lifecycle status of a call.
///
/// The Russian literals are the ones existing clients send and existing rows
/// hold; they are never translated.
///
/// # Examples
/// ```
/// use calls_backend::domain::CallStatus;
///
/// assert_eq!("закрыта".parse::<CallStatus>().unwrap(), CallStatus::Closed);
/// assert!("closed".parse::<CallStatus>().is_err());
/// assert_eq!(CallStatus::Open.as_str(), "открыта");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CallStatus {
    #[serde(rename = "открыта")]
    Open,
    #[serde(rename = "закрыта")]
    Closed,
}

impl CallStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => STATUS_OPEN,
            Self::Closed => STATUS_CLOSED,
        }
    }
}

impl FromStr for CallStatus {
    type Err = CallValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_OPEN => Ok(Self::Open),
            STATUS_CLOSED => Ok(Self::Closed),
            _ => Err(CallValidationError::InvalidStatus),
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        let pattern = r"^(\+?\d{1,3}|\d)?[\d\-]{7,15}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("phone number regex failed to compile: {error}"))
    })
}

/// Contact phone number accepted by the calls API.
///
/// Optional country prefix (`+` and up to three digits, or a single digit)
/// followed by 7 to 15 digits or hyphens. Input is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: &str) -> Result<Self, CallValidationError> {
        if !phone_regex().is_match(raw) {
            return Err(CallValidationError::InvalidPhoneNumber);
        }
        Ok(Self(raw.to_owned()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated input for a new call.
///
/// The status is always [`CallStatus::Open`]; the store assigns the id and
/// creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCall {
    owner: UserId,
    client_name: String,
    phone_number: PhoneNumber,
    description: String,
}

impl NewCall {
    /// Validate the raw fields of a create request.
    ///
    /// The phone number is checked first so a malformed number is always
    /// reported as such.
    pub fn try_new(
        owner: UserId,
        client_name: &str,
        phone_number: &str,
        description: &str,
    ) -> Result<Self, CallValidationError> {
        let phone_number = PhoneNumber::new(phone_number)?;
        if client_name.trim().is_empty() {
            return Err(CallValidationError::EmptyClientName);
        }
        if description.trim().is_empty() {
            return Err(CallValidationError::EmptyDescription);
        }
        Ok(Self {
            owner,
            client_name: client_name.to_owned(),
            phone_number,
            description: description.to_owned(),
        })
    }

    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    #[must_use]
    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn status(&self) -> CallStatus {
        CallStatus::Open
    }
}

/// Persisted call record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub id: CallId,
    pub owner: UserId,
    pub client_name: String,
    pub phone_number: PhoneNumber,
    pub description: String,
    pub status: CallStatus,
    pub created_at: DateTime<Utc>,
}
