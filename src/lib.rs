//! Graceful server lifecycle.
//!
//! Owns a listener, serves an HTTP or gRPC handler on it, and turns external
//! cancellation into a drain before reporting how the server stopped.
//!
//! ```text
//!   Server::new(address, options) ──▶ Server ──▶ serve_http(ctx, axum::Router)
//!                                           └──▶ serve_grpc(ctx, tonic Router)
//!
//!   ctx cancelled ──▶ watcher task ──▶ drain (bounded for HTTP, graceful for gRPC)
//!                                   └──▶ first drain failure → Error::Shutdown
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod net;
pub mod server;

// Serve modes
pub mod grpc;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use error::{BoxError, DrainError, Error, Result};
pub use lifecycle::Shutdown;
pub use observability::{Logger, NopLogger, TracingLogger};
pub use server::{with_listener, with_logger, with_timeout, Server, ServerOption, DEFAULT_TIMEOUT};
