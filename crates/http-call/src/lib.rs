//! Synchronous HTTP/JSON adapter.
//!
//! Implements the [`dispatch`] ports whose downstream speaks plain JSON over
//! HTTP:
//!
//! - [`IdentityClient`]: [`dispatch::IdentityVerifier`], `POST /authenticate`.
//! - [`MailClient`]: [`dispatch::MailSender`], `POST /send`.
//! - [`HttpLogWriter`]: [`dispatch::LogWriter`], `POST /log`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request building, timeouts, status classification and
//! downstream envelope parsing all live here. The [`dispatch`] crate sees only
//! the port traits and [`dispatch::AdapterError`].
//!
//! ## Failure classification
//!
//! | Downstream outcome | Result |
//! |--------------------|--------|
//! | Connect error, timeout, body cut off mid-read | `AdapterError::Transport` |
//! | `401 Unauthorized` | `AdapterError::Unauthorized` |
//! | Any other non-2xx | `AdapterError::DownstreamFailure` |
//! | 2xx, undecodable body | `AdapterError::DownstreamFailure` |
//! | 2xx, envelope `error: true` | `AdapterError::DownstreamFailure` |
//! | 2xx, envelope `error: false` | `Ok(Delivery)` |
//!
//! No request is retried.

pub mod downstream;
pub mod identity;
pub mod log;
pub mod mail;

pub use downstream::{DownstreamEnvelope, HttpDownstream};
pub use identity::IdentityClient;
pub use log::HttpLogWriter;
pub use mail::MailClient;
