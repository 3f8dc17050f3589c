//! Publishing while no broker is reachable.

use std::time::{Duration, Instant};

use dispatch::{AdapterError, LogPayload, LogWriter};
use queue::{QueueLogWriter, QueueSettings};

fn unreachable() -> QueueSettings {
    QueueSettings {
        // Nothing listens on port 1 on loopback.
        brokers: "127.0.0.1:1".to_owned(),
        topic: "logs_topic".to_owned(),
        message_timeout: Duration::from_millis(500),
    }
}

#[tokio::test]
async fn refused_broker_is_publish_error_and_drops_producer() {
    let writer = QueueLogWriter::new(unreachable());
    let entry = LogPayload {
        name: "event".to_owned(),
        data: "something happened".to_owned(),
    };

    let started = Instant::now();
    let err = writer.write_log(&entry).await.unwrap_err();

    match err {
        AdapterError::Publish { topic, .. } => assert_eq!(topic, "logs_topic"),
        other => panic!("expected publish error, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!writer.publisher().has_producer().await);
}
