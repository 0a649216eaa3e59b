//! Request/response serve mode.
//!
//! # Data Flow
//! ```text
//! Server::serve_http
//!     → engine.rs (accept loop, one task per connection, axum Router)
//!     → lifecycle::drive (watcher runs BoundedDrain on cancellation)
//!     → Closed sentinel | Accept error | DrainError::Timeout
//! ```
//!
//! # Design Decisions
//! - HTTP/1.1 and HTTP/2 via hyper-util's auto builder
//! - The drain is bounded; connections still open at the bound are closed
//! - The accept loop only stops through the drain or a listener failure

pub mod engine;

pub use engine::{BoundedDrain, HttpEngine, HttpEngineError};
