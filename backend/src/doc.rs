//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI document for the gateway's REST surface.
//! It registers every handler in `inbound::http`, the wire DTOs, and the
//! bearer security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::CallStatus;
use crate::inbound::http::ErrorBody;
use crate::inbound::http::auth_routes::{AuthRequest, TokenResponse};
use crate::inbound::http::calls::{CallResponse, CreateCallBody, UpdateStatusBody};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the gateway.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Calls gateway API",
        description = "Account registration, token login and owner-scoped call records."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth_routes::register,
        crate::inbound::http::auth_routes::login,
        crate::inbound::http::calls::create_call,
        crate::inbound::http::calls::list_calls,
        crate::inbound::http::calls::get_call,
        crate::inbound::http::calls::update_call_status,
        crate::inbound::http::calls::delete_call,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AuthRequest,
        TokenResponse,
        CreateCallBody,
        UpdateStatusBody,
        CallResponse,
        CallStatus,
        ErrorBody
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "calls", description = "Calls owned by the authenticated user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
