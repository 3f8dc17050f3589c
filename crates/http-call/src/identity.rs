//! Identity-verification client.

use std::time::Duration;

use async_trait::async_trait;
use dispatch::{AdapterError, AuthPayload, Delivery, IdentityVerifier};

use crate::HttpDownstream;

/// Message returned to the caller after a successful login.
pub const LOGIN_MESSAGE: &str = "logged!";

/// Calls `POST {base}/authenticate` on the identity service.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    downstream: HttpDownstream,
}

impl IdentityClient {
    /// Creates a client for the identity service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            downstream: HttpDownstream::new("identity", base_url, "/authenticate", timeout)?,
        })
    }
}

#[async_trait]
impl IdentityVerifier for IdentityClient {
    async fn authenticate(&self, credentials: &AuthPayload) -> Result<Delivery, AdapterError> {
        let envelope = self.downstream.post(credentials).await?;
        let delivery = Delivery::confirmed(LOGIN_MESSAGE);
        Ok(match envelope.data {
            Some(identity) => delivery.with_data(identity),
            None => delivery,
        })
    }
}
