//! RPC error type.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by either side of the binary RPC protocol.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The TCP connection to the server could not be established.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        /// Address that was dialled.
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The call did not complete before its deadline.
    #[error("call did not complete within {0:?}")]
    DeadlineExceeded(Duration),

    /// Reading or writing a frame failed.
    #[error("frame i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A frame body could not be encoded or decoded.
    #[error("frame codec failed: {0}")]
    Codec(String),

    /// The peer closed the connection before replying.
    #[error("connection closed before a reply arrived")]
    Closed,

    /// The reply does not belong to the call that was sent.
    #[error("reply sequence {got} does not match call sequence {expected}")]
    SequenceMismatch {
        expected: u64,
        got: u64,
    },

    /// The remote procedure ran and returned an error.
    #[error("remote procedure failed: {0}")]
    Remote(String),
}
