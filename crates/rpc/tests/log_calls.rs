//! Client and writer behaviour against a real in-process server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dispatch::{AdapterError, LogPayload, LogWriter};
use rpc::{serve, LogArgs, LogInfoHandler, LogInfoService, RpcClient, RpcError, RpcLogWriter, LOG_INFO_METHOD};
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct Recorder {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl LogInfoService for Recorder {
    async fn log_info(&self, args: LogArgs) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if args.name.is_empty() {
            return Err("name is required".to_owned());
        }
        Ok(format!("Processed payload via RPC: {}", args.name))
    }
}

/// Starts a log service on an ephemeral port; returns its address and call counter.
async fn start_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let recorder = Recorder::default();
    let calls = Arc::clone(&recorder.calls);
    tokio::spawn(serve(listener, Arc::new(LogInfoHandler::new(recorder))));
    (address, calls)
}

fn entry(name: &str) -> LogPayload {
    LogPayload {
        name: name.to_owned(),
        data: "something happened".to_owned(),
    }
}

#[tokio::test]
async fn write_log_returns_procedure_result() {
    let (address, calls) = start_server().await;
    let writer = RpcLogWriter::new(address, TIMEOUT);

    let delivery = writer.write_log(&entry("event")).await.unwrap();

    assert_eq!(delivery.message, "Processed payload via RPC: event");
    assert!(delivery.data.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_writes_each_reach_the_server() {
    let (address, calls) = start_server().await;
    let writer = Arc::new(RpcLogWriter::new(address, TIMEOUT));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let writer = Arc::clone(&writer);
            tokio::spawn(async move { writer.write_log(&entry(&format!("event-{i}"))).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn procedure_error_is_transport_failure() {
    let (address, _) = start_server().await;
    let writer = RpcLogWriter::new(address, TIMEOUT);

    let err = writer.write_log(&entry("")).await.unwrap_err();

    match err {
        AdapterError::Transport { reason, .. } => assert!(reason.contains("name is required")),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_method_is_remote_error() {
    let (address, calls) = start_server().await;
    let client = RpcClient::new(address, TIMEOUT);

    let err = client
        .call::<_, String>("RPCServer.Nope", &LogArgs {
            name: "n".to_owned(),
            data: "d".to_owned(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RpcError::Remote(ref message) if message.contains("RPCServer.Nope")));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_server_is_connect_error() {
    let client = RpcClient::new("127.0.0.1:1", TIMEOUT);
    let err = client
        .call::<_, String>(LOG_INFO_METHOD, &LogArgs {
            name: "n".to_owned(),
            data: "d".to_owned(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RpcError::Connect { .. }));
}

#[tokio::test]
async fn silent_server_is_bounded_by_timeout() {
    // Accepts connections and never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let writer = RpcLogWriter::new(address, Duration::from_millis(200));
    let started = Instant::now();
    let err = writer.write_log(&entry("event")).await.unwrap_err();

    assert!(matches!(err, AdapterError::Transport { .. }));
    assert!(started.elapsed() < Duration::from_millis(1500));
}
