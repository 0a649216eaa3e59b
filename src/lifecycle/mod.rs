//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Cancellation (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT or caller → Shutdown::trigger → CancellationToken cancelled
//!
//! Serve call (drive.rs):
//!     caller task:   engine serve ─────────────────────────────┐
//!     watcher task:  token cancelled → drain → [error slot]    │
//!                                                              ▼
//!                    serve returned → sentinel? → read error slot → result
//! ```
//!
//! # Design Decisions
//! - One drive routine for both engines, parameterized by drain and sentinel
//! - The error slot holds at most one value; later failures are dropped
//! - The slot is read only after the engine has stopped

pub mod drive;
pub mod shutdown;
pub mod signals;

pub use drive::{Drain, EngineError};
pub use shutdown::Shutdown;
