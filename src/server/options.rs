//! Ordered construction options.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::observability::{Logger, NopLogger};
use crate::server::DEFAULT_TIMEOUT;

/// Settings a [`ServerOption`] can change before the server is built.
pub(crate) struct Options {
    pub(crate) listener: Option<TcpListener>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            listener: None,
            logger: Arc::new(NopLogger),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Options {
    /// Apply `options` in order; later options overwrite earlier ones.
    pub(crate) fn apply(options: impl IntoIterator<Item = ServerOption>) -> Self {
        let mut settings = Options::default();
        for option in options {
            (option.0)(&mut settings);
        }
        settings
    }
}

/// A single construction override, see [`Server::new`](crate::Server::new).
pub struct ServerOption(Box<dyn FnOnce(&mut Options) + Send>);

impl ServerOption {
    pub(crate) fn new(f: impl FnOnce(&mut Options) + Send + 'static) -> Self {
        Self(Box::new(f))
    }
}

impl fmt::Debug for ServerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerOption")
    }
}

/// Serve on an already bound listener instead of binding the address.
pub fn with_listener(listener: TcpListener) -> ServerOption {
    ServerOption::new(move |o| o.listener = Some(listener))
}

/// Send lifecycle breadcrumbs to `logger`.
pub fn with_logger(logger: Arc<dyn Logger>) -> ServerOption {
    ServerOption::new(move |o| o.logger = logger)
}

/// Bound the HTTP drain to `timeout`.
pub fn with_timeout(timeout: Duration) -> ServerOption {
    ServerOption::new(move |o| o.timeout = timeout)
}
