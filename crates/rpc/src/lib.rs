//! Binary request/response RPC.
//!
//! A deliberately small protocol for calling named procedures on the log
//! service over TCP:
//!
//! ```text
//! ┌────────────────────┬──────────────────────────────┐
//! │ length: u32 (BE)   │ bincode(RpcCall | RpcReply)  │
//! └────────────────────┴──────────────────────────────┘
//! ```
//!
//! A call carries a sequence number, a method name such as
//! `RPCServer.LogInfo`, and bincode-encoded arguments. The reply echoes the
//! sequence number and carries either the bincode-encoded result or an error
//! string produced by the remote procedure.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** [`RpcLogWriter`] implements [`dispatch::LogWriter`];
//! [`serve`] and [`LogInfoService`] are the log service's side of the same
//! protocol.
//!
//! ## Connections
//!
//! The client dials a new connection per call and drops it when the call
//! ends. Log-write volume is moderate, so the handshake cost is accepted in
//! exchange for never holding a stale socket.

pub mod client;
pub mod errors;
pub mod frame;
pub mod log;
pub mod server;

pub use client::RpcClient;
pub use errors::RpcError;
pub use frame::{LogArgs, RpcCall, RpcReply, LOG_INFO_METHOD, MAX_FRAME_LENGTH};
pub use log::RpcLogWriter;
pub use server::{serve, LogInfoHandler, LogInfoService, RpcHandler};
