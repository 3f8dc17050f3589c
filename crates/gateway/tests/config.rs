//! Configuration extraction and validation.

use std::net::SocketAddr;
use std::time::Duration;

use dispatch::Transport;
use figment::providers::Serialized;
use figment::{Figment, Jail};
use gateway::{ConfigError, GatewayConfig, LogFormat};
use serde_json::json;

fn figment(values: serde_json::Value) -> Figment {
    Figment::new().merge(Serialized::defaults(values))
}

#[test]
fn defaults_fill_optional_keys() {
    let config = GatewayConfig::from_figment(figment(json!({
        "auth_url": "http://authentication-service",
        "mail_url": "http://mail-service",
        "log_rpc_addr": "logger-service:5001",
    })))
    .unwrap();

    assert_eq!(config.listen_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    assert_eq!(config.log_transport, Transport::Rpc);
    assert_eq!(config.queue_topic, "logs_topic");
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.downstream_timeout(), Duration::from_secs(5));
    assert_eq!(config.grpc_deadline(), Duration::from_secs(1));
    assert_eq!(config.queue_message_timeout(), Duration::from_secs(5));
    assert_eq!(config.log_endpoint().unwrap(), "logger-service:5001");
    assert!(config.otlp_endpoint.is_none());
}

#[test]
fn missing_required_url_is_a_load_error() {
    let result = GatewayConfig::from_figment(figment(json!({
        "mail_url": "http://mail-service",
        "log_rpc_addr": "logger-service:5001",
    })));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn blank_url_is_rejected() {
    let result = GatewayConfig::from_figment(figment(json!({
        "auth_url": "  ",
        "mail_url": "http://mail-service",
        "log_rpc_addr": "logger-service:5001",
    })));
    assert!(matches!(result, Err(ConfigError::Empty { key: "auth_url" })));
}

#[test]
fn selected_transport_needs_its_endpoint() {
    let result = GatewayConfig::from_figment(figment(json!({
        "auth_url": "http://authentication-service",
        "mail_url": "http://mail-service",
        "log_transport": "grpc",
        "log_rpc_addr": "logger-service:5001",
    })));
    assert!(matches!(
        result,
        Err(ConfigError::MissingTransportSetting {
            transport: Transport::Grpc,
            key: "log_grpc_url",
        })
    ));
}

#[test]
fn queue_transport_reads_brokers_and_overrides() {
    let config = GatewayConfig::from_figment(figment(json!({
        "listen_addr": "127.0.0.1:9000",
        "auth_url": "http://authentication-service",
        "mail_url": "http://mail-service",
        "log_transport": "queue",
        "queue_brokers": "kafka:9092",
        "queue_topic": "audit",
        "queue_message_timeout_ms": 250,
        "log_format": "pretty",
    })))
    .unwrap();

    assert_eq!(config.log_transport, Transport::Queue);
    assert_eq!(config.log_endpoint().unwrap(), "kafka:9092");
    assert_eq!(config.queue_topic, "audit");
    assert_eq!(config.queue_message_timeout(), Duration::from_millis(250));
    assert_eq!(config.log_format, LogFormat::Pretty);
}

#[test]
fn unknown_transport_is_a_load_error() {
    let result = GatewayConfig::from_figment(figment(json!({
        "auth_url": "http://authentication-service",
        "mail_url": "http://mail-service",
        "log_transport": "carrier_pigeon",
    })));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn load_reads_prefixed_environment() {
    Jail::expect_with(|jail| {
        jail.set_env("GATEWAY_AUTH_URL", "http://authentication-service");
        jail.set_env("GATEWAY_MAIL_URL", "http://mail-service");
        jail.set_env("GATEWAY_LOG_TRANSPORT", "queue");
        jail.set_env("GATEWAY_QUEUE_BROKERS", "kafka:9092");
        jail.set_env("GATEWAY_DOWNSTREAM_TIMEOUT_MS", "750");

        let config = GatewayConfig::load().map_err(|err| err.to_string())?;

        assert_eq!(config.log_transport, Transport::Queue);
        assert_eq!(config.log_endpoint().unwrap(), "kafka:9092");
        assert_eq!(config.downstream_timeout(), Duration::from_millis(750));
        assert_eq!(config.queue_topic, "logs_topic");
        Ok(())
    });
}

#[test]
fn load_fails_when_selected_transport_is_unconfigured() {
    Jail::expect_with(|jail| {
        jail.set_env("GATEWAY_AUTH_URL", "http://authentication-service");
        jail.set_env("GATEWAY_MAIL_URL", "http://mail-service");
        jail.set_env("GATEWAY_LOG_TRANSPORT", "queue");

        assert!(matches!(
            GatewayConfig::load(),
            Err(ConfigError::MissingTransportSetting {
                transport: Transport::Queue,
                key: "queue_brokers",
            })
        ));
        Ok(())
    });
}
