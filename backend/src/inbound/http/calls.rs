//! Call handlers. Every route is mounted behind [`super::auth::BearerAuth`]
//! and scoped to the authenticated owner.
//!
//! ```text
//! POST   /calls              {"client_name":..,"phone_number":..,"description":..}
//! GET    /calls
//! GET    /calls/{id}
//! PATCH  /calls/{id}/status  {"status":"закрыта"}
//! DELETE /calls/{id}
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::AuthenticatedUser;
use super::error::ErrorBody;
use super::state::HttpState;
use super::validation::parse_call_id;
use crate::domain::ports::CreateCallRequest;
use crate::domain::{ApiResult, Call, CallStatus};

/// Request body for `POST /calls`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCallBody {
    #[schema(example = "Acme Ltd")]
    pub client_name: String,
    #[schema(example = "+71234567890")]
    pub phone_number: String,
    #[schema(example = "Printer on floor 3 is jammed")]
    pub description: String,
}

impl From<CreateCallBody> for CreateCallRequest {
    fn from(value: CreateCallBody) -> Self {
        Self {
            client_name: value.client_name,
            phone_number: value.phone_number,
            description: value.description,
        }
    }
}

/// Request body for `PATCH /calls/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusBody {
    #[schema(example = "закрыта")]
    pub status: String,
}

/// Wire representation of a call. The owner is implied by the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CallResponse {
    pub id: i64,
    pub client_name: String,
    pub phone_number: String,
    pub description: String,
    pub status: CallStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Call> for CallResponse {
    fn from(call: Call) -> Self {
        Self {
            id: call.id.get(),
            client_name: call.client_name,
            phone_number: call.phone_number.as_ref().to_owned(),
            description: call.description,
            status: call.status,
            created_at: call.created_at,
        }
    }
}

/// Open a new call owned by the caller.
#[utoipa::path(
    post,
    path = "/calls",
    request_body = CreateCallBody,
    responses(
        (status = 201, description = "Call created", headers(("Location" = String, description = "Path of the new call"))),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["calls"],
    operation_id = "createCall"
)]
#[post("")]
pub async fn create_call(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateCallBody>,
) -> ApiResult<HttpResponse> {
    let id = state
        .calls
        .create(user.id(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, format!("/calls/{id}")))
        .finish())
}

/// List the caller's calls, newest first.
#[utoipa::path(
    get,
    path = "/calls",
    responses(
        (status = 200, description = "Calls owned by the caller", body = [CallResponse]),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["calls"],
    operation_id = "listCalls"
)]
#[get("")]
pub async fn list_calls(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<CallResponse>>> {
    let calls = state.calls_query.list(user.id()).await?;
    Ok(web::Json(calls.into_iter().map(CallResponse::from).collect()))
}

/// Fetch one of the caller's calls.
#[utoipa::path(
    get,
    path = "/calls/{id}",
    params(("id" = i64, Path, description = "Call identifier")),
    responses(
        (status = 200, description = "The call", body = CallResponse),
        (status = 400, description = "Invalid call ID", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 404, description = "Call not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["calls"],
    operation_id = "getCall"
)]
#[get("/{id}")]
pub async fn get_call(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<CallResponse>> {
    let id = parse_call_id(&path)?;
    let call = state.calls_query.get(id, user.id()).await?;
    Ok(web::Json(call.into()))
}

/// Set a call's status to `открыта` or `закрыта`.
#[utoipa::path(
    patch,
    path = "/calls/{id}/status",
    params(("id" = i64, Path, description = "Call identifier")),
    request_body = UpdateStatusBody,
    responses(
        (status = 204, description = "Status updated"),
        (status = 400, description = "Invalid call ID, body or status", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 404, description = "Call not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["calls"],
    operation_id = "updateCallStatus"
)]
#[patch("/{id}/status")]
pub async fn update_call_status(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_call_id(&path)?;
    state
        .calls
        .update_status(id, user.id(), &payload.status)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete one of the caller's calls.
#[utoipa::path(
    delete,
    path = "/calls/{id}",
    params(("id" = i64, Path, description = "Call identifier")),
    responses(
        (status = 204, description = "Call deleted"),
        (status = 400, description = "Invalid call ID", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 404, description = "Call not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["calls"],
    operation_id = "deleteCall"
)]
#[delete("/{id}")]
pub async fn delete_call(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_call_id(&path)?;
    state.calls.delete(id, user.id()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the call handlers on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_call)
        .service(list_calls)
        .service(get_call)
        .service(update_call_status)
        .service(delete_call);
}

#[cfg(test)]
#[path = "calls_tests.rs"]
mod tests;
