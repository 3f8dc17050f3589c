//! Core dispatch domain for the gateway.
//!
//! This crate contains the canonical request and response shapes, the JSON
//! envelope codec, the error taxonomy, the port traits every transport adapter
//! implements, and the [`Dispatcher`] that ties them together. Adapter crates
//! implement the traits defined here; they never add dispatch rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a transport must do; the adapter crates (`http-call`,
//! `rpc`, `grpc`, `queue`) define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`action`] | `Action`, payload types, `InboundRequest`, `Request` |
//! | [`envelope`] | `ResponseEnvelope`, `Delivery`, `Reply`, `ReplyStatus` |
//! | [`codec`] | JSON decode/encode of requests and envelopes |
//! | [`errors`] | `DecodeError`, `AdapterError`, `DispatchError` |
//! | [`ports`] | `IdentityVerifier`, `LogWriter`, `MailSender`, `TransportBinding` |
//! | [`dispatcher`] | `Dispatcher` and request validation |

pub mod action;
pub mod codec;
pub mod dispatcher;
pub mod envelope;
pub mod errors;
pub mod ports;

// Re-export everything at the crate root for ergonomic usage by adapter crates.
pub use action::{Action, AuthPayload, InboundRequest, LogPayload, MailPayload, Request, UnknownAction};
pub use dispatcher::{validate, Dispatcher};
pub use envelope::{Confirmation, Delivery, Reply, ReplyStatus, ResponseEnvelope};
pub use errors::{AdapterError, DecodeError, DispatchError};
pub use ports::{Adapters, IdentityVerifier, LogWriter, MailSender, Transport, TransportBinding};
