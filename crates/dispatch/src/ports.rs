//! Port traits implemented by the transport adapter crates.
//!
//! The dispatcher depends only on these traits. Each adapter crate supplies
//! one or more implementations; the gateway binary picks which ones to wire
//! according to the [`TransportBinding`].
//!
//! All traits use `async_trait` so they stay object-safe behind `Arc<dyn _>`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Action, AdapterError, AuthPayload, Delivery, LogPayload, MailPayload};

// ---------------------------------------------------------------------------
// Transports and binding
// ---------------------------------------------------------------------------

/// One of the four wire protocols an adapter can speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Synchronous HTTP/JSON call.
    Http,
    /// Length-delimited binary RPC over TCP.
    Rpc,
    /// gRPC unary call.
    Grpc,
    /// Fire-and-forget publish to the message broker.
    Queue,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Transport::Http => "http",
            Transport::Rpc => "rpc",
            Transport::Grpc => "grpc",
            Transport::Queue => "queue",
        })
    }
}

/// Static mapping from action to transport.
///
/// `auth` and `mail` are only reachable over HTTP. `log` has four equivalent
/// bindings; which one is used is an operational choice (delivery guarantee
/// versus latency) made once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportBinding {
    log: Transport,
}

impl TransportBinding {
    /// Creates a binding that routes `log` over `log_transport`.
    pub fn new(log_transport: Transport) -> Self {
        Self { log: log_transport }
    }

    /// Returns the transport bound to `action`.
    pub fn transport_for(self, action: Action) -> Transport {
        match action {
            Action::Auth | Action::Mail => Transport::Http,
            Action::Log => self.log,
        }
    }
}

impl Default for TransportBinding {
    /// Binary RPC for `log`.
    fn default() -> Self {
        Self::new(Transport::Rpc)
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Verifies credentials with the identity service.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Authenticates `credentials`. On success the delivery's data carries the
    /// authenticated identity record.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Unauthorized`] when the identity service rejects the
    /// credentials; any other variant for transport or downstream failure.
    async fn authenticate(&self, credentials: &AuthPayload) -> Result<Delivery, AdapterError>;
}

/// Records a log entry in the log-storage service.
///
/// Implemented once per transport. All implementations are interchangeable
/// from the dispatcher's point of view.
#[async_trait]
pub trait LogWriter: Send + Sync {
    /// The transport this writer uses.
    fn transport(&self) -> Transport;

    /// Records `entry`.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`]; queue-backed writers report
    /// [`AdapterError::Publish`].
    async fn write_log(&self, entry: &LogPayload) -> Result<Delivery, AdapterError>;
}

/// Hands a message to the mail service.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Sends `mail`.
    ///
    /// # Errors
    ///
    /// Any [`AdapterError`] for transport or downstream failure.
    async fn send_mail(&self, mail: &MailPayload) -> Result<Delivery, AdapterError>;
}

/// The capability bundle handed to the dispatcher: one adapter per port.
#[derive(Clone)]
pub struct Adapters {
    pub identity: Arc<dyn IdentityVerifier>,
    pub log: Arc<dyn LogWriter>,
    pub mail: Arc<dyn MailSender>,
}

impl Adapters {
    /// Returns the binding implied by the wired adapters.
    pub fn binding(&self) -> TransportBinding {
        TransportBinding::new(self.log.transport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_mail_are_always_http() {
        for log in [Transport::Http, Transport::Rpc, Transport::Grpc, Transport::Queue] {
            let binding = TransportBinding::new(log);
            assert_eq!(binding.transport_for(Action::Auth), Transport::Http);
            assert_eq!(binding.transport_for(Action::Mail), Transport::Http);
            assert_eq!(binding.transport_for(Action::Log), log);
        }
    }

    #[test]
    fn transport_parses_from_config_strings() {
        let parsed: Transport = serde_json::from_str("\"grpc\"").unwrap();
        assert_eq!(parsed, Transport::Grpc);
        assert_eq!(parsed.to_string(), "grpc");
    }
}
