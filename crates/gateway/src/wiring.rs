//! Adapter selection.
//!
//! `auth` and `mail` always go over HTTP. `log` goes over whichever transport
//! the configuration names; exactly one log writer is constructed.

use std::sync::Arc;

use anyhow::Context;
use dispatch::{Adapters, Dispatcher, LogWriter, Transport};
use grpc::GrpcLogWriter;
use http_call::{HttpLogWriter, IdentityClient, MailClient};
use queue::{QueueLogWriter, QueueSettings};
use rpc::RpcLogWriter;

use crate::GatewayConfig;

/// Builds one adapter per port from `config`.
///
/// No connection is opened here; every adapter connects on first use.
///
/// # Errors
///
/// Fails if the log endpoint is missing or an HTTP client or gRPC endpoint
/// cannot be built from the configured URL.
pub fn build_adapters(config: &GatewayConfig) -> anyhow::Result<Adapters> {
    let timeout = config.downstream_timeout();
    let identity = IdentityClient::new(&config.auth_url, timeout)
        .context("failed to build identity client")?;
    let mail = MailClient::new(&config.mail_url, timeout).context("failed to build mail client")?;

    let endpoint = config.log_endpoint()?;
    let log: Arc<dyn LogWriter> = match config.log_transport {
        Transport::Http => Arc::new(
            HttpLogWriter::new(endpoint, timeout).context("failed to build log client")?,
        ),
        Transport::Rpc => Arc::new(RpcLogWriter::new(endpoint, timeout)),
        Transport::Grpc => Arc::new(
            GrpcLogWriter::new(endpoint, config.grpc_deadline())
                .with_context(|| format!("invalid gRPC log endpoint '{endpoint}'"))?,
        ),
        Transport::Queue => Arc::new(QueueLogWriter::new(QueueSettings {
            brokers: endpoint.to_owned(),
            topic: config.queue_topic.clone(),
            message_timeout: config.queue_message_timeout(),
        })),
    };
    tracing::info!(log_transport = %log.transport(), log_endpoint = endpoint, "adapters wired");

    Ok(Adapters {
        identity: Arc::new(identity),
        log,
        mail: Arc::new(mail),
    })
}

/// Builds the dispatcher over [`build_adapters`].
///
/// # Errors
///
/// See [`build_adapters`].
pub fn build_dispatcher(config: &GatewayConfig) -> anyhow::Result<Dispatcher> {
    Ok(Dispatcher::new(build_adapters(config)?))
}
