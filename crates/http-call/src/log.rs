//! Log writer over HTTP: `POST {base}/log`.

use std::time::Duration;

use async_trait::async_trait;
use dispatch::{AdapterError, Delivery, LogPayload, LogWriter, Transport};

use crate::HttpDownstream;

#[derive(Debug, Clone)]
pub struct HttpLogWriter {
    downstream: HttpDownstream,
}

impl HttpLogWriter {
    /// Creates a writer for the log service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            downstream: HttpDownstream::new("log", base_url, "/log", timeout)?,
        })
    }
}

#[async_trait]
impl LogWriter for HttpLogWriter {
    fn transport(&self) -> Transport {
        Transport::Http
    }

    async fn write_log(&self, entry: &LogPayload) -> Result<Delivery, AdapterError> {
        self.downstream.post(entry).await?;
        Ok(Delivery::confirmed("logged entry successfully"))
    }
}
