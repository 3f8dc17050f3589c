//! Gateway configuration.
//!
//! Read once at startup from environment variables prefixed with `GATEWAY_`
//! (`GATEWAY_AUTH_URL`, `GATEWAY_LOG_TRANSPORT`, ...). There is no hot reload.

use std::net::SocketAddr;
use std::time::Duration;

use dispatch::Transport;
use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every configuration environment variable.
pub const ENV_PREFIX: &str = "GATEWAY_";

/// Output format of the `tracing` subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable output for local development.
    Pretty,
}

/// Invalid or incomplete configuration. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is missing or has the wrong type.
    #[error("failed to read configuration: {0}")]
    Load(#[from] figment::Error),

    /// A required URL or address is empty.
    #[error("'{key}' must not be empty")]
    Empty {
        /// Configuration key, without the prefix.
        key: &'static str,
    },

    /// The selected log transport has no endpoint configured.
    #[error("log transport '{transport}' requires '{key}' to be set")]
    MissingTransportSetting {
        transport: Transport,
        /// Configuration key, without the prefix.
        key: &'static str,
    },
}

/// Complete gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Base URL of the identity service.
    pub auth_url: String,

    /// Base URL of the mail service.
    pub mail_url: String,

    /// Transport used for `log`. Chosen once per deployment.
    #[serde(default = "default_log_transport")]
    pub log_transport: Transport,

    /// Base URL of the log service's HTTP API. Required for `http`.
    #[serde(default)]
    pub log_http_url: Option<String>,

    /// `host:port` of the log service's binary RPC listener. Required for `rpc`.
    #[serde(default)]
    pub log_rpc_addr: Option<String>,

    /// URI of the log service's gRPC listener. Required for `grpc`.
    #[serde(default)]
    pub log_grpc_url: Option<String>,

    /// Kafka bootstrap servers. Required for `queue`.
    #[serde(default)]
    pub queue_brokers: Option<String>,

    #[serde(default = "default_queue_topic")]
    pub queue_topic: String,

    /// Bound on HTTP and binary RPC calls.
    #[serde(default = "default_downstream_timeout_ms")]
    pub downstream_timeout_ms: u64,

    /// Bound on a gRPC call, connecting included.
    #[serde(default = "default_grpc_deadline_ms")]
    pub grpc_deadline_ms: u64,

    /// Bound on a queue publish, broker acknowledgement included.
    #[serde(default = "default_queue_message_timeout_ms")]
    pub queue_message_timeout_ms: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint. Span export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_log_transport() -> Transport {
    Transport::Rpc
}

fn default_queue_topic() -> String {
    "logs_topic".to_owned()
}

fn default_downstream_timeout_ms() -> u64 {
    5_000
}

fn default_grpc_deadline_ms() -> u64 {
    1_000
}

fn default_queue_message_timeout_ms() -> u64 {
    5_000
}

impl GatewayConfig {
    /// Loads and validates the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]; the gateway must not start.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extracts and validates the configuration from `figment`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`].
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field requirements that serde cannot express.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Empty`] if `auth_url` or `mail_url` is blank.
    /// - [`ConfigError::MissingTransportSetting`] if the endpoint for
    ///   `log_transport` is missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth_url.trim().is_empty() {
            return Err(ConfigError::Empty { key: "auth_url" });
        }
        if self.mail_url.trim().is_empty() {
            return Err(ConfigError::Empty { key: "mail_url" });
        }
        self.log_endpoint().map(|_| ())
    }

    /// Returns the endpoint setting for the selected log transport.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingTransportSetting`] if it is unset or blank.
    pub fn log_endpoint(&self) -> Result<&str, ConfigError> {
        let (key, value) = match self.log_transport {
            Transport::Http => ("log_http_url", &self.log_http_url),
            Transport::Rpc => ("log_rpc_addr", &self.log_rpc_addr),
            Transport::Grpc => ("log_grpc_url", &self.log_grpc_url),
            Transport::Queue => ("queue_brokers", &self.queue_brokers),
        };
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingTransportSetting {
                transport: self.log_transport,
                key,
            })
    }

    pub fn downstream_timeout(&self) -> Duration {
        Duration::from_millis(self.downstream_timeout_ms)
    }

    pub fn grpc_deadline(&self) -> Duration {
        Duration::from_millis(self.grpc_deadline_ms)
    }

    pub fn queue_message_timeout(&self) -> Duration {
        Duration::from_millis(self.queue_message_timeout_ms)
    }
}
