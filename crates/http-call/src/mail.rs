//! Mail-service client: `POST {base}/send`.

use std::time::Duration;

use async_trait::async_trait;
use dispatch::{AdapterError, Delivery, MailPayload, MailSender};

use crate::HttpDownstream;

#[derive(Debug, Clone)]
pub struct MailClient {
    downstream: HttpDownstream,
}

impl MailClient {
    /// Creates a client for the mail service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            downstream: HttpDownstream::new("mail", base_url, "/send", timeout)?,
        })
    }
}

#[async_trait]
impl MailSender for MailClient {
    async fn send_mail(&self, mail: &MailPayload) -> Result<Delivery, AdapterError> {
        self.downstream.post(mail).await?;
        Ok(Delivery::confirmed("mail sent successfully"))
    }
}
