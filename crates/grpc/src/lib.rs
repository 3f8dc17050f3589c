//! Streaming-RPC (gRPC) log adapter.
//!
//! [`GrpcLogWriter`] implements [`dispatch::LogWriter`] by issuing one unary
//! `logs.LogService/WriteLog` call per log entry. The generated client and
//! server stubs live in [`proto`]; the log service implements
//! [`LogService`] and mounts it with [`LogServiceServer`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Depends on `dispatch` for the port and on `tonic` for
//! the transport.

mod client;

/// Generated protobuf types and stubs for `logs.LogService`.
pub mod proto {
    tonic::include_proto!("logs");
}

pub use client::GrpcLogWriter;
pub use proto::log_service_server::{LogService, LogServiceServer};
pub use proto::{Log, LogRequest, LogResponse};
