//! RPC status vocabulary and its mapping to the domain taxonomy.

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ErrorCode};

/// Failure class carried by an RPC error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcCode {
    InvalidArgument,
    AlreadyExists,
    Unauthenticated,
    Internal,
}

impl RpcCode {
    /// Transport status used for this code.
    #[must_use]
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Domain category re-raised by the client.
    #[must_use]
    pub fn error_code(self) -> ErrorCode {
        match self {
            Self::InvalidArgument => ErrorCode::InvalidRequest,
            Self::AlreadyExists => ErrorCode::Conflict,
            Self::Unauthenticated => ErrorCode::Unauthorized,
            Self::Internal => ErrorCode::InternalError,
        }
    }

    /// Rebuild a domain error from a received failure.
    pub fn into_error(self, message: &str) -> Error {
        let message = if message.trim().is_empty() {
            "credential authority request failed"
        } else {
            message
        };
        Error::new(self.error_code(), message)
    }
}

impl From<ErrorCode> for RpcCode {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::InvalidRequest => Self::InvalidArgument,
            ErrorCode::Conflict => Self::AlreadyExists,
            ErrorCode::Unauthorized => Self::Unauthenticated,
            ErrorCode::NotFound | ErrorCode::InternalError => Self::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::InvalidRequest, RpcCode::InvalidArgument, 400)]
    #[case(ErrorCode::Conflict, RpcCode::AlreadyExists, 409)]
    #[case(ErrorCode::Unauthorized, RpcCode::Unauthenticated, 401)]
    #[case(ErrorCode::InternalError, RpcCode::Internal, 500)]
    fn codes_map_one_to_one(
        #[case] domain: ErrorCode,
        #[case] rpc: RpcCode,
        #[case] status: u16,
    ) {
        assert_eq!(RpcCode::from(domain), rpc);
        assert_eq!(rpc.error_code(), domain);
        assert_eq!(rpc.http_status().as_u16(), status);
    }

    #[rstest]
    fn not_found_is_internal_on_the_wire() {
        assert_eq!(RpcCode::from(ErrorCode::NotFound), RpcCode::Internal);
    }

    #[rstest]
    #[case(RpcCode::InvalidArgument, "\"invalid_argument\"")]
    #[case(RpcCode::AlreadyExists, "\"already_exists\"")]
    #[case(RpcCode::Unauthenticated, "\"unauthenticated\"")]
    #[case(RpcCode::Internal, "\"internal\"")]
    fn wire_names(#[case] code: RpcCode, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&code).expect("serialise"), expected);
    }

    #[rstest]
    fn blank_messages_are_replaced() {
        let err = RpcCode::Internal.into_error("  ");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message().trim().is_empty());
    }
}
