use std::time::Duration;

use async_trait::async_trait;
use dispatch::{AdapterError, Delivery, LogPayload, LogWriter, Transport};
use tonic::transport::Endpoint;

use crate::proto::log_service_client::LogServiceClient;
use crate::proto::{Log, LogRequest};

/// [`LogWriter`] that calls `WriteLog` over gRPC.
///
/// Every write opens its own channel and drops it when the write ends,
/// whether it succeeded, failed, or ran out of time. Connecting and calling
/// share one deadline; exceeding it is reported exactly like a connection
/// failure, as [`AdapterError::Transport`].
#[derive(Debug, Clone)]
pub struct GrpcLogWriter {
    endpoint: Endpoint,
    deadline: Duration,
}

impl GrpcLogWriter {
    /// Creates a writer for the log service at `uri` (e.g.
    /// `http://logger:50001`).
    ///
    /// # Errors
    ///
    /// Returns the transport error if `uri` is not a valid URI.
    pub fn new(uri: impl Into<String>, deadline: Duration) -> Result<Self, tonic::transport::Error> {
        let endpoint = Endpoint::from_shared(uri.into())?
            .connect_timeout(deadline)
            .timeout(deadline);
        Ok(Self { endpoint, deadline })
    }

    async fn call(&self, entry: &LogPayload) -> Result<String, AdapterError> {
        let channel = self
            .endpoint
            .connect()
            .await
            .map_err(|err| AdapterError::transport("log", err))?;
        let mut client = LogServiceClient::new(channel);

        let mut request = tonic::Request::new(LogRequest {
            log_entry: Some(Log {
                name: entry.name.clone(),
                data: entry.data.clone(),
            }),
        });
        request.set_timeout(self.deadline);

        let response = client
            .write_log(request)
            .await
            .map_err(|status| AdapterError::transport("log", status))?;
        Ok(response.into_inner().result)
    }
}

#[async_trait]
impl LogWriter for GrpcLogWriter {
    fn transport(&self) -> Transport {
        Transport::Grpc
    }

    async fn write_log(&self, entry: &LogPayload) -> Result<Delivery, AdapterError> {
        let result = tokio::time::timeout(self.deadline, self.call(entry))
            .await
            .map_err(|_| {
                AdapterError::transport("log", format!("deadline of {:?} exceeded", self.deadline))
            })??;

        tracing::debug!(uri = %self.endpoint.uri(), "log entry written over grpc");
        Ok(Delivery::confirmed(result))
    }
}
