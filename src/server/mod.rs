//! The served process: one listener, one serve call.
//!
//! # Lifecycle
//! ```text
//! Server::new(address, options)      bind (unless with_listener)
//!     → serve_http(ctx, router)      Listening → [ctx cancelled] → bounded drain → Stopped
//!     → serve_grpc(ctx, router)      Listening → [ctx cancelled] → graceful stop → Stopped
//! ```
//!
//! A serve call consumes the server, so a listener is never served twice.

pub mod options;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::{validate_config, ConfigError, ServerConfig};
use crate::error::{Error, Result};
use crate::lifecycle::drive::drive;
use crate::net::listener;
use crate::observability::Logger;

pub use options::{with_listener, with_logger, with_timeout, ServerOption};
use options::Options;

/// Drain bound used when no timeout option is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A bound listener plus the settings for serving it.
pub struct Server {
    address: String,
    listener: TcpListener,
    timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl Server {
    /// Build a server for `address`.
    ///
    /// `options` are applied in order, later ones winning. A listener is
    /// bound on `address` unless [`with_listener`] supplied one.
    pub async fn new(address: impl Into<String>, options: impl IntoIterator<Item = ServerOption>) -> Result<Self> {
        let address = address.into();
        let Options {
            listener,
            logger,
            timeout,
        } = Options::apply(options);

        if timeout.is_zero() {
            return Err(Error::InvalidTimeout);
        }

        let listener = match listener {
            Some(listener) => listener,
            None => listener::bind(&address).await?,
        };

        Ok(Self {
            address,
            listener,
            timeout,
            logger,
        })
    }

    /// Build a server from a validated [`ServerConfig`].
    ///
    /// The config's timeout is applied first, so `options` may override it.
    pub async fn from_config(config: &ServerConfig, options: impl IntoIterator<Item = ServerOption>) -> Result<Self> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let options = std::iter::once(with_timeout(config.shutdown_timeout())).chain(options);
        Self::new(config.address.clone(), options).await
    }

    /// Address the server was configured with.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Upper bound on the HTTP drain.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Logger receiving lifecycle breadcrumbs.
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Serve `handler` over HTTP until `ctx` is cancelled.
    ///
    /// On cancellation, stops accepting and waits up to [`timeout`](Self::timeout)
    /// for in-flight requests; connections still open after that are closed and
    /// the call returns [`Error::Shutdown`]. A listener failure returns
    /// [`Error::Serve`].
    ///
    /// Lifecycle messages go to this server's [`Logger`]. Per-connection
    /// engine events (accepts, connection errors, forced closes, accept
    /// pauses) are emitted through `tracing` instead, so they reach the global
    /// subscriber even when a custom logger is set.
    pub async fn serve_http(self, ctx: CancellationToken, handler: axum::Router) -> Result<()> {
        self.logger.info(&[&"Listening HTTP on ", &self.address]);

        let (engine, drain) = crate::http::engine::engine(self.listener, handler, self.timeout);
        drive(self.logger, ctx, engine.serve(), drain).await
    }

    /// Serve a tonic `router` until `ctx` is cancelled.
    ///
    /// On cancellation, tonic stops gracefully: every open call is allowed to
    /// finish, with no timeout applied. A transport failure returns
    /// [`Error::Serve`].
    ///
    /// As with [`serve_http`](Self::serve_http), only lifecycle messages go to
    /// the [`Logger`]; tonic's own events go through `tracing`.
    pub async fn serve_grpc(self, ctx: CancellationToken, router: tonic::transport::server::Router) -> Result<()> {
        self.logger.info(&[&"Listening GRPC on ", &self.address]);

        let (engine, drain) = crate::grpc::engine::engine(self.listener, router);
        drive(self.logger, ctx, engine.serve(), drain).await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("address", &self.address)
            .field("local_addr", &self.listener.local_addr().ok())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
