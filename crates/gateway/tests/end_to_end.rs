//! Wired gateway against stubbed downstream services.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use figment::providers::Serialized;
use figment::Figment;
use gateway::{build_dispatcher, router, GatewayConfig};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn config(identity: &MockServer, log: &MockServer) -> GatewayConfig {
    GatewayConfig::from_figment(Figment::new().merge(Serialized::defaults(json!({
        "auth_url": identity.base_url(),
        "mail_url": identity.base_url(),
        "log_transport": "http",
        "log_http_url": log.base_url(),
        "downstream_timeout_ms": 2000,
    }))))
    .unwrap()
}

async fn post(app: axum::Router, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/handle")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn auth_flows_through_to_identity_service() {
    let identity = MockServer::start();
    let log = MockServer::start();
    let authenticate = identity.mock(|when, then| {
        when.method(POST)
            .path("/authenticate")
            .json_body(json!({"email": "a@b.com", "password": "secret"}));
        then.status(202).json_body(json!({
            "error": false,
            "message": "Logged user a@b.com in",
            "data": {"id": 1, "email": "a@b.com"}
        }));
    });

    let app = router(Arc::new(build_dispatcher(&config(&identity, &log)).unwrap()));
    let (status, body) = post(
        app,
        r#"{"action":"auth","auth":{"email":"a@b.com","password":"secret"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"error": false, "message": "logged!", "data": {"id": 1, "email": "a@b.com"}})
    );
    assert_eq!(authenticate.calls(), 1);
}

#[tokio::test]
async fn downstream_rejection_becomes_401() {
    let identity = MockServer::start();
    let log = MockServer::start();
    identity.mock(|when, then| {
        when.method(POST).path("/authenticate");
        then.status(401)
            .json_body(json!({"error": true, "message": "invalid credentials for a@b.com"}));
    });

    let app = router(Arc::new(build_dispatcher(&config(&identity, &log)).unwrap()));
    let (status, body) = post(
        app,
        r#"{"action":"auth","auth":{"email":"a@b.com","password":"wrong"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": true, "message": "invalid credentials"}));
}

#[tokio::test]
async fn log_over_http_reaches_log_service_once() {
    let identity = MockServer::start();
    let log = MockServer::start();
    let write = log.mock(|when, then| {
        when.method(POST)
            .path("/log")
            .json_body(json!({"name": "event", "data": "body"}));
        then.status(202).json_body(json!({"error": false, "message": "logged"}));
    });

    let app = router(Arc::new(build_dispatcher(&config(&identity, &log)).unwrap()));
    let (status, body) = post(app, r#"{"action":"log","log":{"name":"event","data":"body"}}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": false, "message": "logged entry successfully"}));
    assert_eq!(write.calls(), 1);
}
