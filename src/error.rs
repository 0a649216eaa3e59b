//! Error types surfaced by the server lifecycle.

use std::time::Duration;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Boxed error used for engine and drain failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by construction and serve calls.
#[derive(Debug, Error)]
pub enum Error {
    /// The listener could not be bound on the configured address.
    #[error("Failed to create listener on {address}: {source}")]
    Listen {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// A zero drain timeout was supplied.
    #[error("Shutdown timeout must be greater than zero")]
    InvalidTimeout,

    /// The configuration file could not be loaded or failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The engine stopped for a reason other than a requested shutdown.
    #[error("Failed to serve: {0}")]
    Serve(#[source] BoxError),

    /// The drain triggered by cancellation did not complete cleanly.
    #[error("Failed to shutdown: {0}")]
    Shutdown(#[source] BoxError),
}

/// Failure of a drain operation.
#[derive(Debug, Error)]
pub enum DrainError {
    /// Connections were still open when the drain bound elapsed.
    #[error("{open} connection(s) still open after {timeout:?}; closed forcibly")]
    Timeout { timeout: Duration, open: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
