//! Handlers for `Register`, `Login` and the liveness probe.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use crate::domain::Error;
use crate::domain::ports::CredentialAuthority;
use crate::rpc::{
    CredentialsMessage, EmptyMessage, HEALTH_PATH, HealthMessage, LOGIN_PATH, REGISTER_PATH,
    RPC_SCOPE, SERVING, TokenMessage,
};

use super::RpcError;

/// Dependencies of the RPC handlers.
#[derive(Clone)]
pub struct RpcState {
    pub authority: Arc<dyn CredentialAuthority>,
}

impl RpcState {
    pub fn new(authority: Arc<dyn CredentialAuthority>) -> Self {
        Self { authority }
    }
}

async fn register(
    state: web::Data<RpcState>,
    body: web::Json<CredentialsMessage>,
) -> Result<HttpResponse, RpcError> {
    let CredentialsMessage { username, password } = body.into_inner();
    state.authority.register(&username, &password).await?;
    Ok(HttpResponse::Ok().json(EmptyMessage {}))
}

async fn login(
    state: web::Data<RpcState>,
    body: web::Json<CredentialsMessage>,
) -> Result<HttpResponse, RpcError> {
    let CredentialsMessage { username, password } = body.into_inner();
    let token = state.authority.login(&username, &password).await?;
    Ok(HttpResponse::Ok().json(TokenMessage {
        token: token.into_inner(),
    }))
}

async fn health(state: web::Data<RpcState>) -> Result<HttpResponse, RpcError> {
    state.authority.check_liveness().await?;
    Ok(HttpResponse::Ok().json(HealthMessage {
        status: SERVING.to_owned(),
    }))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "rejecting malformed rpc body");
        RpcError(Error::invalid_request("invalid request body")).into()
    })
}

/// Mount the RPC routes; `state` is shared across workers.
pub fn configure(state: web::Data<RpcState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope(RPC_SCOPE)
                .app_data(state)
                .app_data(json_config())
                .route(REGISTER_PATH, web::post().to(register))
                .route(LOGIN_PATH, web::post().to(login))
                .route(HEALTH_PATH, web::get().to(health)),
        );
    }
}
