//! Streaming/RPC engine backed by tonic.

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;

use crate::error::BoxError;
use crate::lifecycle::{Drain, EngineError};

/// tonic has no "stopped" sentinel: a requested stop returns `Ok(())`.
impl EngineError for tonic::transport::Error {
    fn is_closed(&self) -> bool {
        false
    }
}

/// A tonic router paired with its listener, waiting to be served.
pub struct GrpcEngine {
    listener: TcpListener,
    router: Router,
    stop: oneshot::Receiver<()>,
}

/// Drain that asks tonic to stop gracefully.
///
/// tonic stops accepting and then waits for every open call and connection
/// to finish. No bound is applied here.
pub struct GracefulStop {
    stop: oneshot::Sender<()>,
}

/// Create an engine serving `router` on `listener` and its drain handle.
pub fn engine(listener: TcpListener, router: Router) -> (GrpcEngine, GracefulStop) {
    let (tx, rx) = oneshot::channel();
    (
        GrpcEngine {
            listener,
            router,
            stop: rx,
        },
        GracefulStop { stop: tx },
    )
}

impl GrpcEngine {
    /// Serve until gracefully stopped or until tonic fails.
    pub async fn serve(self) -> Result<(), tonic::transport::Error> {
        let stop = self.stop;
        self.router
            .serve_with_incoming_shutdown(TcpListenerStream::new(self.listener), async move {
                // A dropped sender also stops the server.
                let _ = stop.await;
            })
            .await
    }
}

impl Drain for GracefulStop {
    async fn drain(self) -> Result<(), BoxError> {
        // The receiver is gone only if the engine already stopped.
        let _ = self.stop.send(());
        Ok(())
    }
}
