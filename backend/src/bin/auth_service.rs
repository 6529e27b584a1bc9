//! Credential authority entry point.
//!
//! Loads `AUTH_*` settings, applies migrations, and serves the internal RPC
//! until SIGINT/SIGTERM or a listener failure.

use std::net::SocketAddr;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};

use calls_backend::domain::CredentialService;
use calls_backend::outbound::persistence::{DbPool, DieselUserRepository, run_pending_migrations};
use calls_backend::outbound::security::{BcryptPasswordHasher, JwtTokenService};
use calls_backend::server::{
    AuthServiceSettings, NetworkService, auth_server_factory, init_tracing, run_until,
    secret_fingerprint, shutdown_signal,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = AuthServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    init_tracing(settings.log_level());

    let secret = settings.jwt_secret()?;
    info!(fingerprint = %secret_fingerprint(&secret), "signing secret loaded");

    let pool_config = settings.pool_config()?;
    run_pending_migrations(pool_config.database_url())
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;

    let tokens = JwtTokenService::new(&secret, settings.token_ttl(), Arc::new(DefaultClock))
        .wrap_err("invalid token settings")?;
    let authority = CredentialService::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(BcryptPasswordHasher::default()),
        Arc::new(tokens),
    );

    let drain = settings.shutdown_timeout();
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port()));
    let mut service = NetworkService::new(
        "auth-service",
        addr,
        auth_server_factory(Arc::new(authority), drain),
    );
    service.start()?;

    let signal = async {
        if let Err(error) = shutdown_signal().await {
            warn!(%error, "cannot listen for termination signals");
            std::future::pending::<()>().await;
        }
    };
    run_until(&mut service, signal, drain, || {}).await?;
    Ok(())
}
