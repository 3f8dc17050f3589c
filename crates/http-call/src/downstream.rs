//! Shared request/response handling for JSON downstream services.

use std::time::Duration;

use dispatch::AdapterError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{ error, message, data }` envelope every downstream service answers
/// with.
///
/// Parsed leniently: downstream services are not bound by the gateway's own
/// envelope invariants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DownstreamEnvelope {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// One downstream HTTP endpoint with its own client and deadline.
#[derive(Debug, Clone)]
pub struct HttpDownstream {
    service: &'static str,
    url: String,
    http: reqwest::Client,
}

impl HttpDownstream {
    /// Creates an endpoint at `base_url` joined with `path`.
    ///
    /// Every request made through it is bounded by `timeout`, covering
    /// connect, send and body read.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the client cannot be built (e.g. the
    /// TLS backend fails to initialise).
    pub fn new(
        service: &'static str,
        base_url: &str,
        path: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            service,
            url: format!("{}{}", base_url.trim_end_matches('/'), path),
            http,
        })
    }

    /// POSTs `body` as JSON and classifies the answer.
    ///
    /// # Errors
    ///
    /// See the crate-level failure table.
    pub async fn post<T>(&self, body: &T) -> Result<DownstreamEnvelope, AdapterError>
    where
        T: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|err| AdapterError::transport(self.service, err))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AdapterError::unauthorized(self.service));
        }
        if !status.is_success() {
            return Err(AdapterError::downstream(
                self.service,
                format!("unexpected status {status}"),
            ));
        }

        // Deadline or connection loss while reading the body is a transport
        // failure; only a complete body that fails to parse is downstream.
        let body = response
            .bytes()
            .await
            .map_err(|err| AdapterError::transport(self.service, err))?;
        let envelope: DownstreamEnvelope = serde_json::from_slice(&body).map_err(|err| {
            AdapterError::downstream(self.service, format!("undecodable envelope: {err}"))
        })?;

        if envelope.error {
            tracing::debug!(
                service = self.service,
                downstream_message = %envelope.message,
                "downstream reported an application error"
            );
            return Err(AdapterError::downstream(self.service, envelope.message));
        }

        Ok(envelope)
    }
}
