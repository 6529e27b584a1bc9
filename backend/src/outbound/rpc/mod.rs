//! Gateway-side client for the credential authority.

mod http_credential_client;

pub use http_credential_client::{CredentialClientError, HttpCredentialClient};
