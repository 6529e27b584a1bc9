//! Gateway application assembly.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use super::drain_secs;
use super::lifecycle::ServerFactory;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::TokenVerifier;
use crate::inbound::http::auth::BearerAuth;
use crate::inbound::http::auth_routes::{login, register};
use crate::inbound::http::calls;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::json_config;
use crate::middleware::Trace;

/// Everything the gateway's handlers and middleware need.
#[derive(Clone)]
pub struct GatewayDeps {
    pub state: web::Data<HttpState>,
    pub health: web::Data<HealthState>,
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Build the gateway `App`: public auth routes, bearer-guarded call routes,
/// probes, and Swagger UI in debug builds.
pub fn build_gateway_app(
    deps: GatewayDeps,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let calls_scope = web::scope("/calls")
        .wrap(BearerAuth::new(deps.verifier))
        .configure(calls::configure);

    let app = App::new()
        .app_data(deps.state)
        .app_data(deps.health)
        .app_data(json_config())
        .wrap(Trace)
        .service(web::scope("/auth").service(register).service(login))
        .service(calls_scope)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Factory serving the gateway on a bound listener.
pub fn gateway_server_factory(deps: GatewayDeps, drain: Duration) -> ServerFactory {
    Box::new(move |listener: TcpListener| {
        Ok(HttpServer::new(move || build_gateway_app(deps.clone()))
            .disable_signals()
            .shutdown_timeout(drain_secs(drain))
            .listen(listener)?
            .run())
    })
}
