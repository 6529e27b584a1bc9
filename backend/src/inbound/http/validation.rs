//! Shared validation helpers for inbound HTTP adapters.
//!
//! Malformed bodies and path parameters are reported with the same
//! `{ "error": ... }` shape as every other failure.

use actix_web::web;
use tracing::debug;

use crate::domain::{CallId, Error};

pub(crate) const INVALID_REQUEST_FORMAT: &str = "Invalid request format";
pub(crate) const INVALID_CALL_ID: &str = "Invalid call ID";

/// JSON extractor configuration whose failures render as domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        debug!(error = %err, path = %req.path(), "rejecting malformed request body");
        Error::invalid_request(INVALID_REQUEST_FORMAT).into()
    })
}

/// Parse a call id path segment. Anything other than a positive integer is a
/// client error.
pub(crate) fn parse_call_id(raw: &str) -> Result<CallId, Error> {
    raw.parse::<i64>()
        .ok()
        .and_then(|value| CallId::new(value).ok())
        .ok_or_else(|| Error::invalid_request(INVALID_CALL_ID))
}
