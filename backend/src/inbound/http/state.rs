//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CallsCommand, CallsQuery, CredentialAuthority};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialAuthority>,
    pub calls: Arc<dyn CallsCommand>,
    pub calls_query: Arc<dyn CallsQuery>,
}

impl HttpState {
    /// Bundle the ports the gateway handlers depend on.
    ///
    /// # Examples
    /// ```ignore
    /// let state = HttpState::new(Arc::new(client), service.clone(), service);
    /// ```
    pub fn new(
        credentials: Arc<dyn CredentialAuthority>,
        calls: Arc<dyn CallsCommand>,
        calls_query: Arc<dyn CallsQuery>,
    ) -> Self {
        Self {
            credentials,
            calls,
            calls_query,
        }
    }
}
