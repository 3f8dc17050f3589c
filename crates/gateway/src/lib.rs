//! Gateway composition root.
//!
//! Everything that turns the `dispatch` domain and the adapter crates into a
//! running service lives here:
//!
//! 1. **Configuration**: [`config::GatewayConfig`] is read once from
//!    `GATEWAY_*` environment variables and validated before anything starts.
//! 2. **Observability**: [`telemetry::init`] installs the `tracing`
//!    subscriber (JSON or pretty) and, when configured, the OTLP exporter.
//! 3. **Wiring**: [`wiring::build_dispatcher`] picks one adapter per port and
//!    hands the bundle to [`dispatch::Dispatcher`].
//! 4. **Endpoint**: [`routes::router`] exposes the dispatcher over HTTP.
//!
//! The binary in `main.rs` only sequences these steps.
//!
//! ## Architectural Layer
//!
//! **Composition root.** This is the only crate that depends on every other
//! crate in the workspace.

pub mod config;
pub mod routes;
pub mod telemetry;
pub mod wiring;

pub use config::{ConfigError, GatewayConfig, LogFormat};
pub use routes::router;
pub use wiring::{build_adapters, build_dispatcher};
