//! HTTP endpoint.
//!
//! | Method | Path | Behaviour |
//! |--------|------|-----------|
//! | `POST` | `/handle` | Decode, dispatch, answer with the envelope |
//! | `POST` | `/` | Fixed success envelope; a liveness probe for callers |
//!
//! The status code comes from the dispatcher's [`dispatch::Reply`]; the body
//! is always a JSON envelope, including when the body itself is refused (for
//! example over the size limit), which answers 400.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use dispatch::{codec, DispatchError, Dispatcher, Reply, ResponseEnvelope};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Message of the `POST /` envelope.
pub const HIT_MESSAGE: &str = "Hit the broker";

/// Builds the gateway router.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", post(hit))
        .route("/handle", post(handle))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                request_id = %Uuid::new_v4(),
                method = %request.method(),
                path = %request.uri().path(),
            )
        }))
        .with_state(dispatcher)
}

async fn hit() -> Response {
    envelope_response(StatusCode::OK, &ResponseEnvelope::success(HIT_MESSAGE, None))
}

async fn handle(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let reply = match body {
        Ok(body) => dispatcher.handle(&body).await,
        Err(rejection) => {
            tracing::info!(error = %rejection, "request body rejected");
            let err = DispatchError::MalformedPayload {
                reason: rejection.body_text(),
            };
            Reply::failure(err.status(), err.public_message())
        }
    };
    let status = StatusCode::from_u16(reply.status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    envelope_response(status, &reply.envelope)
}

fn envelope_response(status: StatusCode, envelope: &ResponseEnvelope) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        codec::encode(envelope),
    )
        .into_response()
}
