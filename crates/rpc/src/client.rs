//! RPC client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpStream;

use crate::frame::{self, RpcCall, RpcReply};
use crate::RpcError;

/// Calls procedures on a single RPC server.
///
/// Each [`call`](Self::call) dials a fresh TCP connection, exchanges exactly
/// one call and one reply, and closes the connection. The whole exchange,
/// dialling included, is bounded by the client's timeout.
#[derive(Debug)]
pub struct RpcClient {
    address: String,
    timeout: Duration,
    next_seq: AtomicU64,
}

impl RpcClient {
    /// Creates a client for the server at `address` (`host:port`).
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
            next_seq: AtomicU64::new(1),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Calls `method` with `args` and decodes its result.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Connect`] if the server cannot be reached.
    /// - [`RpcError::DeadlineExceeded`] if no reply arrives within the timeout.
    /// - [`RpcError::Remote`] if the procedure itself returned an error.
    /// - Any other variant for framing or protocol failures.
    pub async fn call<A, R>(&self, method: &str, args: &A) -> Result<R, RpcError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let call = RpcCall {
            seq,
            method: method.to_owned(),
            args: frame::encode(args)?,
        };

        let reply = tokio::time::timeout(self.timeout, self.exchange(&call))
            .await
            .map_err(|_| RpcError::DeadlineExceeded(self.timeout))??;

        if reply.seq != seq {
            return Err(RpcError::SequenceMismatch {
                expected: seq,
                got: reply.seq,
            });
        }
        match reply.outcome {
            Ok(body) => frame::decode(&body),
            Err(message) => Err(RpcError::Remote(message)),
        }
    }

    async fn exchange(&self, call: &RpcCall) -> Result<RpcReply, RpcError> {
        let stream = TcpStream::connect(&self.address)
            .await
            .map_err(|source| RpcError::Connect {
                address: self.address.clone(),
                source,
            })?;
        let mut framed = frame::framed(stream);

        framed.send(frame::encode_frame(call)?).await?;
        let body = framed.next().await.ok_or(RpcError::Closed)??;
        frame::decode(&body)
    }
}
