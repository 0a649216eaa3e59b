//! Request/response engine.
//!
//! Serves an [`axum::Router`] over HTTP/1.1 and HTTP/2 on every accepted
//! connection. Stopping is split in two: the drain cancels `stop`, which ends
//! the accept loop and asks each connection to finish its in-flight request;
//! if connections are still open when the drain bound elapses, `force` closes
//! them.
//!
//! Per-connection events are emitted with `tracing` at trace level inside a
//! `connection` span, independently of the server's [`Logger`].
//!
//! [`Logger`]: crate::Logger

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::Router;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tracing::Instrument;

use crate::error::{BoxError, DrainError};
use crate::lifecycle::{Drain, EngineError};
use crate::net::connection::{ConnectionGuard, ConnectionTracker};
use crate::net::listener::{is_connection_error, is_resource_exhaustion};

/// Errors returned by [`HttpEngine::serve`].
#[derive(Debug, Error)]
pub enum HttpEngineError {
    /// The engine stopped because a drain was requested.
    #[error("HTTP server closed")]
    Closed,

    /// The listener failed for a reason unrelated to a single peer.
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] io::Error),
}

impl EngineError for HttpEngineError {
    fn is_closed(&self) -> bool {
        matches!(self, HttpEngineError::Closed)
    }
}

/// Shortest pause after the listener ran out of resources.
const MIN_ACCEPT_PAUSE: Duration = Duration::from_millis(5);
/// Longest pause between retries while resources stay exhausted.
const MAX_ACCEPT_PAUSE: Duration = Duration::from_secs(1);

/// Accept loop over an owned listener.
pub struct HttpEngine {
    listener: TcpListener,
    router: Router,
    stop: CancellationToken,
    force: CancellationToken,
    accept_done: CancellationToken,
    tracker: ConnectionTracker,
}

/// Drain that waits at most `timeout` for connections to finish.
pub struct BoundedDrain {
    stop: CancellationToken,
    force: CancellationToken,
    accept_done: CancellationToken,
    tracker: ConnectionTracker,
    timeout: Duration,
}

/// Create an engine serving `router` on `listener` and its drain handle.
pub fn engine(listener: TcpListener, router: Router, timeout: Duration) -> (HttpEngine, BoundedDrain) {
    let stop = CancellationToken::new();
    let force = CancellationToken::new();
    let accept_done = CancellationToken::new();
    let tracker = ConnectionTracker::new();

    let drain = BoundedDrain {
        stop: stop.clone(),
        force: force.clone(),
        accept_done: accept_done.clone(),
        tracker: tracker.clone(),
        timeout,
    };
    let engine = HttpEngine {
        listener,
        router,
        stop,
        force,
        accept_done,
        tracker,
    };
    (engine, drain)
}

impl HttpEngine {
    /// Serve until drained or until the listener fails.
    ///
    /// Returns [`HttpEngineError::Closed`] once a drain has stopped the
    /// engine and every connection task has ended. Running out of file
    /// descriptors or socket buffers pauses accepting with a growing delay
    /// instead of failing.
    pub async fn serve(self) -> Result<(), HttpEngineError> {
        let HttpEngine {
            listener,
            router,
            stop,
            force,
            accept_done,
            tracker,
        } = self;
        let mut connections = JoinSet::new();
        let mut pause: Option<Duration> = None;

        let result = loop {
            tokio::select! {
                () = stop.cancelled() => break Err(HttpEngineError::Closed),
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        pause = None;
                        let guard = tracker.track();
                        let span = tracing::trace_span!("connection", id = guard.id(), %peer);
                        tracing::trace!(parent: &span, "Connection accepted");
                        connections.spawn(
                            serve_connection(stream, peer, router.clone(), stop.clone(), force.clone(), guard)
                                .instrument(span),
                        );
                    }
                    Err(e) if is_connection_error(&e) => {
                        tracing::trace!(error = %e, "Skipping failed accept");
                    }
                    Err(e) if is_resource_exhaustion(&e) => {
                        let wait = pause.map_or(MIN_ACCEPT_PAUSE, |p| (p * 2).min(MAX_ACCEPT_PAUSE));
                        pause = Some(wait);
                        tracing::warn!(error = %e, retry_in = ?wait, "Accept failed, pausing");

                        let stopped = tokio::select! {
                            () = stop.cancelled() => true,
                            () = tokio::time::sleep(wait) => false,
                        };
                        if stopped {
                            break Err(HttpEngineError::Closed);
                        }
                    }
                    Err(e) => break Err(HttpEngineError::Accept(e)),
                },
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        };
        drop(listener);
        // Every accepted connection is tracked by now.
        accept_done.cancel();

        if !matches!(result, Err(HttpEngineError::Closed)) {
            connections.abort_all();
        }
        while connections.join_next().await.is_some() {}

        result
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    router: Router,
    stop: CancellationToken,
    force: CancellationToken,
    guard: ConnectionGuard,
) {
    let service = router.map_request(move |mut req: Request<Incoming>| {
        req.extensions_mut().insert(ConnectInfo(peer));
        req
    });
    let builder = Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), TowerToHyperService::new(service));
    tokio::pin!(conn);

    let mut draining = false;
    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::trace!(error = %e, "Connection error");
                }
                break;
            }
            () = stop.cancelled(), if !draining => {
                draining = true;
                conn.as_mut().graceful_shutdown();
            }
            () = force.cancelled() => {
                tracing::trace!("Connection closed forcibly");
                break;
            }
        }
    }
    drop(guard);
}

impl Drain for BoundedDrain {
    async fn drain(self) -> Result<(), BoxError> {
        self.stop.cancel();

        let settled = async {
            // A connection accepted in the same poll that saw `stop` is only
            // counted once the accept loop has exited.
            self.accept_done.cancelled().await;
            self.tracker.wait_idle().await;
        };
        match tokio::time::timeout(self.timeout, settled).await {
            Ok(()) => Ok(()),
            Err(_) => {
                let open = self.tracker.active_count();
                self.force.cancel();
                Err(Box::new(DrainError::Timeout {
                    timeout: self.timeout,
                    open,
                }))
            }
        }
    }
}
