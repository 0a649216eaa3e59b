//! Observability.
//!
//! # Data Flow
//! ```text
//! Server lifecycle (listening, context closed, shutting down, stopped)
//!     → Arc<dyn Logger> injected at construction
//!     → NopLogger (default) | TracingLogger → tracing subscriber → stdout
//! ```
//!
//! # Design Decisions
//! - The lifecycle never depends on a concrete logging backend
//! - Engine internals (per-connection errors) use `tracing` directly at trace level
//! - Log level configurable via config and `RUST_LOG`

pub mod logging;

pub use logging::{Logger, NopLogger, TracingLogger};
