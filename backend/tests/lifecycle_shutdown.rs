//! The gateway served through the listener lifecycle, stopped by a signal.

mod support;

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::web;
use tokio::sync::oneshot;

use calls_backend::server::{ListenerState, NetworkService, gateway_server_factory, run_until};

const DRAIN: Duration = Duration::from_secs(2);

#[tokio::test]
async fn signal_drains_the_gateway_and_flips_readiness() {
    let deps = support::gateway_deps(support::credential_service());
    let health = web::Data::clone(&deps.health);
    let mut service = NetworkService::new(
        "gateway",
        SocketAddr::from(([127, 0, 0, 1], 0)),
        gateway_server_factory(deps, DRAIN),
    );
    service.start().expect("gateway starts");
    health.mark_ready();
    let addr = service.local_addr().expect("bound address");

    let ready = reqwest::get(format!("http://{addr}/health/ready"))
        .await
        .expect("probe request");
    assert_eq!(ready.status(), reqwest::StatusCode::OK);

    let (trigger, signal) = oneshot::channel::<()>();
    trigger.send(()).expect("signal receiver alive");
    let drained = web::Data::clone(&health);
    run_until(
        &mut service,
        async {
            let _ = signal.await;
        },
        DRAIN,
        move || drained.mark_unhealthy(),
    )
    .await
    .expect("clean drain");

    assert!(!health.is_alive());
    assert_eq!(service.state(), ListenerState::Stopped);
    let refused = reqwest::get(format!("http://{addr}/health/live")).await;
    assert!(refused.is_err(), "listener no longer accepts requests");
}
