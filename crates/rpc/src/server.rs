//! RPC server loop and the typed log-service boundary.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};

use crate::frame::{self, LogArgs, RpcCall, RpcReply, LOG_INFO_METHOD};
use crate::RpcError;

/// Untyped procedure table.
#[async_trait]
pub trait RpcHandler: Send + Sync + 'static {
    /// Runs `method` on bincode-encoded `args`.
    ///
    /// Returns the bincode-encoded result, or an error string that is sent
    /// back to the caller as-is.
    async fn handle(&self, method: &str, args: &[u8]) -> Result<Vec<u8>, String>;
}

/// Accepts connections on `listener` forever, serving each on its own task.
///
/// A connection may carry any number of calls; they are answered in order.
/// A broken connection is logged and dropped without affecting the others.
///
/// # Errors
///
/// Returns the I/O error if `accept` itself fails.
pub async fn serve<H: RpcHandler>(listener: TcpListener, handler: Arc<H>) -> io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            if let Err(err) = serve_connection(stream, handler.as_ref()).await {
                tracing::debug!(%peer, error = %err, "rpc connection closed with error");
            }
        });
    }
}

async fn serve_connection<H: RpcHandler>(stream: TcpStream, handler: &H) -> Result<(), RpcError> {
    let mut framed = frame::framed(stream);
    while let Some(body) = framed.next().await {
        let call: RpcCall = frame::decode(&body?)?;
        let outcome = handler.handle(&call.method, &call.args).await;
        let reply = RpcReply {
            seq: call.seq,
            outcome,
        };
        framed.send(frame::encode_frame(&reply)?).await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Log service
// ---------------------------------------------------------------------------

/// What the log service implements to answer `RPCServer.LogInfo`.
#[async_trait]
pub trait LogInfoService: Send + Sync + 'static {
    /// Records one entry and returns a human-readable result.
    async fn log_info(&self, args: LogArgs) -> Result<String, String>;
}

/// Adapts a [`LogInfoService`] to the untyped [`RpcHandler`] table.
pub struct LogInfoHandler<S> {
    service: S,
}

impl<S: LogInfoService> LogInfoHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: LogInfoService> RpcHandler for LogInfoHandler<S> {
    async fn handle(&self, method: &str, args: &[u8]) -> Result<Vec<u8>, String> {
        if method != LOG_INFO_METHOD {
            return Err(format!("rpc: can't find method {method}"));
        }
        let args: LogArgs = frame::decode(args).map_err(|err| err.to_string())?;
        let result = self.service.log_info(args).await?;
        frame::encode(&result).map_err(|err| err.to_string())
    }
}
