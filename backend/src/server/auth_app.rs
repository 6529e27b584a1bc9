//! Credential authority server assembly.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};

use super::drain_secs;
use super::lifecycle::ServerFactory;
use crate::domain::ports::CredentialAuthority;
use crate::inbound::rpc::{RpcState, configure};
use crate::middleware::Trace;

/// Factory serving the RPC routes for `authority` on a bound listener.
///
/// Actix's own worker shutdown runs slightly longer than `drain`, leaving the
/// forced stop to the lifecycle deadline.
pub fn auth_server_factory(authority: Arc<dyn CredentialAuthority>, drain: Duration) -> ServerFactory {
    let state = web::Data::new(RpcState::new(authority));
    Box::new(move |listener: TcpListener| {
        Ok(HttpServer::new(move || {
            App::new()
                .wrap(Trace)
                .configure(configure(state.clone()))
        })
        .disable_signals()
        .shutdown_timeout(drain_secs(drain))
        .listen(listener)?
        .run())
    })
}
