//! RPC failure responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::Error;
use crate::middleware::TRACE_ID_HEADER;
use crate::rpc::{RpcCode, RpcErrorMessage};

/// Domain error rendered in the RPC status vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RpcError(pub Error);

impl RpcError {
    fn code(&self) -> RpcCode {
        RpcCode::from(self.0.code())
    }
}

impl From<Error> for RpcError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl ResponseError for RpcError {
    fn status_code(&self) -> StatusCode {
        self.code().http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let code = self.code();
        if code == RpcCode::Internal {
            error!(message = self.0.message(), "credential authority internal failure");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.0.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(RpcErrorMessage {
            code,
            message: self.0.message().to_owned(),
        })
    }
}
