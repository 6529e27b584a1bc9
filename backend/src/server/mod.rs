//! Process wiring shared by the two binaries: settings, logging, the
//! listener lifecycle and the actix application factories.

mod auth_app;
mod config;
mod gateway_app;
pub mod lifecycle;
mod telemetry;

use std::time::Duration;

pub use auth_app::auth_server_factory;
pub use config::{AuthServiceSettings, ConfigError, GatewaySettings, secret_fingerprint};
pub use gateway_app::{GatewayDeps, build_gateway_app, gateway_server_factory};
pub use lifecycle::{
    LifecycleError, ListenerState, NetworkService, ServerFactory, run_until, shutdown_signal,
};
pub use telemetry::init_tracing;

/// Worker shutdown timeout handed to actix, in whole seconds.
///
/// Always strictly longer than `drain`, so [`NetworkService::shutdown`]'s own
/// deadline fires first and a forced stop is never mistaken for a clean one.
fn drain_secs(drain: Duration) -> u64 {
    drain.as_secs() + u64::from(drain.subsec_nanos() > 0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::ZERO, 1)]
    #[case(Duration::from_millis(200), 2)]
    #[case(Duration::from_secs(1), 2)]
    #[case(Duration::from_millis(1900), 3)]
    #[case(Duration::from_secs(10), 11)]
    fn actix_budget_outlasts_the_drain(#[case] drain: Duration, #[case] expected: u64) {
        let secs = drain_secs(drain);
        assert_eq!(secs, expected);
        assert!(Duration::from_secs(secs) > drain);
    }
}
