//! Serve-and-drain coordination shared by both engines.
//!
//! The caller task runs the engine's serve future. A watcher task waits for
//! the cancellation token and then runs the engine's drain. A drain failure
//! goes into a one-slot channel that is read once serving has stopped.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{BoxError, Error, Result};
use crate::observability::Logger;

/// Error produced by an engine's serve future.
pub trait EngineError: std::error::Error + Send + Sync + 'static {
    /// Whether this is the engine's "stopped because asked to" sentinel.
    fn is_closed(&self) -> bool;
}

/// Handle that drains an engine once cancellation has fired.
///
/// The engine's serve future must return as a consequence of `drain`.
pub trait Drain: Send + 'static {
    fn drain(self) -> impl Future<Output = std::result::Result<(), BoxError>> + Send;
}

/// Drive one serve call to completion.
pub(crate) async fn drive<F, E, D>(
    logger: Arc<dyn Logger>,
    ctx: CancellationToken,
    serve: F,
    drain: D,
) -> Result<()>
where
    F: Future<Output = std::result::Result<(), E>>,
    E: EngineError,
    D: Drain,
{
    let (err_tx, mut err_rx) = mpsc::channel::<BoxError>(1);

    let watcher = {
        let logger = Arc::clone(&logger);
        let ctx = ctx.clone();
        tokio::spawn(async move {
            ctx.cancelled().await;
            logger.debug(&[&"Server context closed"]);

            logger.debug(&[&"Shutting down server"]);
            if let Err(e) = drain.drain().await {
                // Only the first shutdown failure is kept.
                let _ = err_tx.try_send(e);
            }
        })
    };

    if let Err(e) = serve.await {
        if !e.is_closed() {
            watcher.abort();
            return Err(Error::Serve(Box::new(e)));
        }
    }

    logger.debug_fmt(format_args!("Server stopped"));

    if ctx.is_cancelled() {
        // The drain stopped the engine and may still be reporting.
        if let Err(join) = watcher.await {
            if join.is_panic() {
                return Err(Error::Shutdown(Box::new(join)));
            }
        }
    } else {
        watcher.abort();
    }

    match err_rx.try_recv() {
        Ok(e) => Err(Error::Shutdown(e)),
        Err(_) => Ok(()),
    }
}
