//! Gateway binary.
//!
//! Startup order: configuration, telemetry, adapters, listener. A
//! configuration error ends the process before anything binds.

use std::sync::Arc;

use anyhow::Context;
use gateway::{build_dispatcher, router, telemetry, GatewayConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::load().context("invalid gateway configuration")?;
    let _telemetry = telemetry::init(config.log_format, config.otlp_endpoint.as_deref())?;

    let dispatcher = build_dispatcher(&config)?;
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        log_transport = %config.log_transport,
        "gateway listening"
    );

    axum::serve(listener, router(Arc::new(dispatcher)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server failed")?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received; draining in-flight requests");
}
