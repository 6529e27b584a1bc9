//! Shared builders for integration tests.
//!
//! Everything runs in-process: in-memory repositories, bcrypt at its minimum
//! cost and a fixed signing secret.

#![allow(dead_code, reason = "each test binary uses a subset of these helpers")]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::DefaultClock;
use zeroize::Zeroizing;

use calls_backend::domain::ports::CredentialAuthority;
use calls_backend::domain::{CallsService, CredentialService};
use calls_backend::inbound::http::health::HealthState;
use calls_backend::inbound::http::state::HttpState;
use calls_backend::outbound::security::{BcryptPasswordHasher, JwtTokenService};
use calls_backend::server::GatewayDeps;
use calls_backend::test_support::{InMemoryCallRepository, InMemoryUserRepository};

pub const SECRET: &str = "integration-test-secret";

pub fn token_service() -> Arc<JwtTokenService> {
    let secret = Zeroizing::new(SECRET.to_owned());
    Arc::new(
        JwtTokenService::new(&secret, Duration::from_secs(3600), Arc::new(DefaultClock))
            .expect("token service"),
    )
}

/// Credential service over a fresh in-memory user store.
pub fn credential_service() -> Arc<dyn CredentialAuthority> {
    Arc::new(CredentialService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(BcryptPasswordHasher::with_cost(4)),
        token_service(),
    ))
}

/// Gateway dependencies with `authority` standing in for the RPC client.
pub fn gateway_deps(authority: Arc<dyn CredentialAuthority>) -> GatewayDeps {
    let calls = Arc::new(CallsService::new(Arc::new(InMemoryCallRepository::new())));
    GatewayDeps {
        state: web::Data::new(HttpState::new(authority, calls.clone(), calls)),
        health: web::Data::new(HealthState::new()),
        verifier: token_service(),
    }
}
