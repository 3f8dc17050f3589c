//! Log writer over binary RPC.

use std::time::Duration;

use async_trait::async_trait;
use dispatch::{AdapterError, Delivery, LogPayload, LogWriter, Transport};

use crate::{LogArgs, RpcClient, LOG_INFO_METHOD};

/// [`LogWriter`] that calls `RPCServer.LogInfo` on the log service.
///
/// The success message is the result string returned by the procedure. Every
/// failure, including an error returned by the procedure, is reported as
/// [`AdapterError::Transport`].
#[derive(Debug)]
pub struct RpcLogWriter {
    client: RpcClient,
}

impl RpcLogWriter {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: RpcClient::new(address, timeout),
        }
    }
}

#[async_trait]
impl LogWriter for RpcLogWriter {
    fn transport(&self) -> Transport {
        Transport::Rpc
    }

    async fn write_log(&self, entry: &LogPayload) -> Result<Delivery, AdapterError> {
        let args = LogArgs {
            name: entry.name.clone(),
            data: entry.data.clone(),
        };
        let result: String = self
            .client
            .call(LOG_INFO_METHOD, &args)
            .await
            .map_err(|err| AdapterError::transport("log", err))?;

        tracing::debug!(address = self.client.address(), "log entry written over rpc");
        Ok(Delivery::confirmed(result))
    }
}
