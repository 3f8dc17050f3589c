//! Message-queue publish adapter.
//!
//! Publishes log entries to a Kafka topic and returns as soon as the broker
//! has accepted them. This is the fire-and-forget alternative to the confirmed
//! log paths in `http-call`, `rpc` and `grpc`: success means "accepted by the
//! broker", not "persisted by the log service".
//!
//! | Type | Role |
//! |------|------|
//! | [`QueueSettings`] | Broker list, topic and delivery timeout |
//! | [`QueuePublisher`] | Owns the producer; creates it lazily, drops it on failure |
//! | [`QueueLogWriter`] | [`dispatch::LogWriter`] over a [`QueuePublisher`] |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Nothing outside this crate sees `rdkafka` types.

mod publisher;

pub use publisher::{QueueLogWriter, QueuePublisher, QueueSettings, ROUTING_KEY};
