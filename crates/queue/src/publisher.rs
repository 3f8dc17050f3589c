use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dispatch::{AdapterError, Delivery, LogPayload, LogWriter, Transport};
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use tokio::sync::Mutex;

/// Record key carried by every log entry; consumers route on it.
pub const ROUTING_KEY: &str = "log.INFO";

const ACCEPTED_MESSAGE: &str = "log entry accepted by broker";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Where and how to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSettings {
    /// Comma-separated `host:port` list.
    pub brokers: String,
    pub topic: String,
    /// Upper bound on a single publish, including broker acknowledgement.
    pub message_timeout: Duration,
}

impl QueueSettings {
    /// Builds the producer configuration.
    ///
    /// `acks=all` so "accepted" means written to every in-sync replica.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("acks", "all")
            .set("message.timeout.ms", self.message_timeout.as_millis().to_string());
        config
    }
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// Owns the Kafka producer for one topic.
///
/// The producer is created on the first publish, not at startup, so the
/// gateway starts even while the broker is down. After a failed publish the
/// producer is dropped and the next publish creates a fresh one. The mutex
/// only guards creation and reset; the producer is cloned out before sending,
/// so concurrent publishes never wait on each other. A reset only clears the
/// slot if it still holds the producer that failed.
pub struct QueuePublisher {
    settings: QueueSettings,
    producer: Mutex<Option<Arc<FutureProducer>>>,
}

impl QueuePublisher {
    pub fn new(settings: QueueSettings) -> Self {
        Self {
            settings,
            producer: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    /// Whether a producer currently exists.
    pub async fn has_producer(&self) -> bool {
        self.producer.lock().await.is_some()
    }

    /// Publishes `payload` with record key `routing_key`.
    ///
    /// Returns the partition and offset the broker assigned.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Publish`] if the producer cannot be created or the
    /// broker does not accept the record within the message timeout.
    pub async fn publish(&self, payload: &[u8], routing_key: &str) -> Result<(i32, i64), AdapterError> {
        let topic = self.settings.topic.as_str();
        let producer = self
            .producer()
            .await
            .map_err(|err| AdapterError::publish(topic, err))?;

        let record = FutureRecord::to(topic).key(routing_key).payload(payload);
        match producer
            .send(record, Timeout::After(self.settings.message_timeout))
            .await
        {
            Ok((partition, offset)) => {
                tracing::debug!(topic, partition, offset, "record accepted by broker");
                Ok((partition, offset))
            }
            Err((err, _)) => {
                tracing::warn!(topic, error = %err, "publish failed; dropping producer");
                self.reset(&producer).await;
                Err(AdapterError::publish(topic, err))
            }
        }
    }

    async fn producer(&self) -> Result<Arc<FutureProducer>, KafkaError> {
        let mut slot = self.producer.lock().await;
        if let Some(producer) = slot.as_ref() {
            return Ok(Arc::clone(producer));
        }
        let producer = Arc::new(self.settings.client_config().create::<FutureProducer>()?);
        tracing::info!(brokers = %self.settings.brokers, topic = %self.settings.topic, "queue producer created");
        *slot = Some(Arc::clone(&producer));
        Ok(producer)
    }

    /// Drops `failed` from the slot unless another publish already replaced it.
    async fn reset(&self, failed: &Arc<FutureProducer>) {
        let mut slot = self.producer.lock().await;
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, failed)) {
            slot.take();
        }
    }
}

impl std::fmt::Debug for QueuePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuePublisher")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Log writer
// ---------------------------------------------------------------------------

/// [`LogWriter`] that publishes `{name, data}` under [`ROUTING_KEY`].
///
/// Succeeds with an *accepted* delivery; the gateway answers 202.
#[derive(Debug)]
pub struct QueueLogWriter {
    publisher: QueuePublisher,
}

impl QueueLogWriter {
    pub fn new(settings: QueueSettings) -> Self {
        Self {
            publisher: QueuePublisher::new(settings),
        }
    }

    pub fn publisher(&self) -> &QueuePublisher {
        &self.publisher
    }
}

#[async_trait]
impl LogWriter for QueueLogWriter {
    fn transport(&self) -> Transport {
        Transport::Queue
    }

    async fn write_log(&self, entry: &LogPayload) -> Result<Delivery, AdapterError> {
        let body = serde_json::to_vec(entry)
            .map_err(|err| AdapterError::publish(&self.publisher.settings().topic, err))?;
        self.publisher.publish(&body, ROUTING_KEY).await?;
        Ok(Delivery::accepted(ACCEPTED_MESSAGE))
    }
}
