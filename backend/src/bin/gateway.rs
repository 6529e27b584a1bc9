//! Gateway entry point.
//!
//! Loads `GATEWAY_*` settings, applies migrations, connects the credential
//! authority client, and serves the public HTTP API until SIGINT/SIGTERM or a
//! listener failure. Liveness flips to 503 before the drain starts.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};

use calls_backend::domain::CallsService;
use calls_backend::inbound::http::health::HealthState;
use calls_backend::inbound::http::state::HttpState;
use calls_backend::outbound::persistence::{DbPool, DieselCallRepository, run_pending_migrations};
use calls_backend::outbound::rpc::HttpCredentialClient;
use calls_backend::outbound::security::{DEFAULT_TOKEN_TTL, JwtTokenService};
use calls_backend::server::{
    GatewayDeps, GatewaySettings, NetworkService, gateway_server_factory, init_tracing, run_until,
    secret_fingerprint, shutdown_signal,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = GatewaySettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    init_tracing(settings.log_level());

    let secret = settings.jwt_secret()?;
    info!(fingerprint = %secret_fingerprint(&secret), "verification secret loaded");
    // The gateway only verifies, so the lifetime is never used to sign.
    let verifier = JwtTokenService::new(&secret, DEFAULT_TOKEN_TTL, Arc::new(DefaultClock))
        .wrap_err("invalid token settings")?;

    let pool_config = settings.pool_config()?;
    run_pending_migrations(pool_config.database_url())
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;

    let client = HttpCredentialClient::new(settings.auth_service_url(), settings.rpc_timeout())
        .wrap_err("failed to build credential authority client")?;
    let calls = Arc::new(CallsService::new(Arc::new(DieselCallRepository::new(pool))));

    let health = web::Data::new(HealthState::new());
    let deps = GatewayDeps {
        state: web::Data::new(HttpState::new(Arc::new(client), calls.clone(), calls)),
        health: health.clone(),
        verifier: Arc::new(verifier),
    };

    let drain = settings.shutdown_timeout();
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port()));
    let mut service = NetworkService::new("gateway", addr, gateway_server_factory(deps, drain));
    service.start()?;
    if service.local_addr().is_some() {
        health.mark_ready();
    }

    let signal = async {
        if let Err(error) = shutdown_signal().await {
            warn!(%error, "cannot listen for termination signals");
            std::future::pending::<()>().await;
        }
    };
    run_until(&mut service, signal, drain, || health.mark_unhealthy()).await?;
    Ok(())
}
