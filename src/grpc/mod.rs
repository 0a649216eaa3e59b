//! Streaming/RPC serve mode.
//!
//! # Data Flow
//! ```text
//! Server::serve_grpc
//!     → engine.rs (tonic Router over the owned listener)
//!     → lifecycle::drive (watcher runs GracefulStop on cancellation)
//!     → Ok on graceful stop | tonic transport error
//! ```
//!
//! # Design Decisions
//! - tonic owns drain semantics; the wrapper applies no timeout
//! - The graceful stop cannot fail, but still goes through the same error slot

pub mod engine;

pub use engine::{GracefulStop, GrpcEngine};
