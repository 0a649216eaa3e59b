//! OS signal handling.
//!
//! # Responsibilities
//! - Resolve a future on SIGINT (Ctrl+C) or SIGTERM
//! - Translate the first signal into a shutdown trigger

use crate::lifecycle::Shutdown;

/// Wait for the first termination signal.
///
/// On Unix, listens for both SIGINT and SIGTERM. A handler that cannot be
/// installed is logged and never fires.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    {
        tokio::select! {
            () = ctrl_c => tracing::info!("Received SIGINT, initiating graceful shutdown"),
            () = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        tracing::info!("Received Ctrl+C, initiating graceful shutdown");
    }
}

impl Shutdown {
    /// Trigger this coordinator on the first termination signal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger_on_signal(&self) -> tokio::task::JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = wait_for_signal() => shutdown.trigger(),
                () = shutdown.triggered() => {}
            }
        })
    }
}
