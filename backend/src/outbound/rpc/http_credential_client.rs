//! `CredentialAuthority` implemented by calling the authority over RPC.
//!
//! Failures reported by the authority are re-raised with the matching domain
//! code. Transport failures (connection refused, timeout, undecodable body)
//! become internal errors; their detail is logged only.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::domain::ports::CredentialAuthority;
use crate::domain::{AccessToken, Error, TraceId};
use crate::middleware::TRACE_ID_HEADER;
use crate::rpc::{
    CredentialsMessage, EmptyMessage, HEALTH_PATH, HealthMessage, LOGIN_PATH, REGISTER_PATH,
    RPC_SCOPE, RpcErrorMessage, SERVING, TokenMessage,
};

const UNAVAILABLE: &str = "credential authority unavailable";

/// Construction failures for [`HttpCredentialClient`].
#[derive(Debug, thiserror::Error)]
pub enum CredentialClientError {
    #[error("failed to build rpc client: {0}")]
    Build(#[from] reqwest::Error),
}

/// RPC client bound to one authority base URL.
#[derive(Clone)]
pub struct HttpCredentialClient {
    client: Client,
    base_url: String,
}

impl HttpCredentialClient {
    /// Create a client for `base_url` (for example `http://127.0.0.1:50051`)
    /// with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Fails when the TLS backend cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CredentialClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, RPC_SCOPE, path)
    }

    fn with_trace(builder: RequestBuilder) -> RequestBuilder {
        match TraceId::current() {
            Some(id) => builder.header(TRACE_ID_HEADER, id.to_string()),
            None => builder,
        }
    }

    async fn send<T>(&self, builder: RequestBuilder, operation: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = Self::with_trace(builder).send().await.map_err(|err| {
            error!(error = %err, %operation, "credential authority request failed");
            Error::internal(UNAVAILABLE)
        })?;
        Self::decode(response, operation).await
    }

    async fn decode<T>(response: Response, operation: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|err| {
                error!(error = %err, %operation, "undecodable credential authority response");
                Error::internal(UNAVAILABLE)
            });
        }

        match response.json::<RpcErrorMessage>().await {
            Ok(failure) => {
                debug!(code = ?failure.code, %operation, "credential authority rejected request");
                Err(failure.code.into_error(&failure.message))
            }
            Err(err) => {
                error!(error = %err, %status, %operation, "undecodable credential authority failure");
                Err(Error::internal(UNAVAILABLE))
            }
        }
    }

    fn credentials(username: &str, password: &str) -> CredentialsMessage {
        CredentialsMessage {
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }
}

#[async_trait]
impl CredentialAuthority for HttpCredentialClient {
    async fn register(&self, username: &str, password: &str) -> Result<(), Error> {
        let builder = self
            .client
            .post(self.url(REGISTER_PATH))
            .json(&Self::credentials(username, password));
        let _: EmptyMessage = self.send(builder, "register").await?;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, Error> {
        let builder = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&Self::credentials(username, password));
        let body: TokenMessage = self.send(builder, "login").await?;
        Ok(AccessToken::new(body.token))
    }

    async fn check_liveness(&self) -> Result<(), Error> {
        let body: HealthMessage = self
            .send(self.client.get(self.url(HEALTH_PATH)), "health")
            .await?;
        if body.status == SERVING {
            Ok(())
        } else {
            Err(Error::internal(UNAVAILABLE))
        }
    }
}
