//! Shared utilities for lifecycle integration tests.

use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use gsrv::observability::logging::Operands;
use gsrv::{with_listener, with_logger, with_timeout, Logger, Server};
use tokio::net::TcpListener;

/// Logger that keeps every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn info(&self, args: &[&dyn fmt::Display]) {
        self.lines.lock().unwrap().push(Operands(args).to_string());
    }
    fn debug(&self, args: &[&dyn fmt::Display]) {
        self.lines.lock().unwrap().push(Operands(args).to_string());
    }
    fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.lines.lock().unwrap().push(args.to_string());
    }
    fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.lines.lock().unwrap().push(args.to_string());
    }
}

/// Build a server on an ephemeral loopback port.
pub async fn local_server(timeout: Duration, logger: Arc<RecordingLogger>) -> (Server, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(
        addr.to_string(),
        [with_listener(listener), with_logger(logger), with_timeout(timeout)],
    )
    .await
    .unwrap();
    (server, addr)
}

/// Router whose `/sleep/{ms}` handler answers after the given delay.
#[allow(dead_code)]
pub fn sleepy_router() -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/sleep/{ms}",
            get(|axum::extract::Path(ms): axum::extract::Path<u64>| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                format!("slept {ms}ms")
            }),
        )
}

/// Wait until something accepts TCP connections on `addr`.
pub async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("nothing listening on {addr}");
}
