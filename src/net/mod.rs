//! Network layer.
//!
//! # Data Flow
//! ```text
//! Server::new
//!     → listener.rs (bind unless a listener was supplied)
//!     → owned by Server until a serve call consumes it
//!
//! HTTP engine accept loop
//!     → listener.rs (classify accept errors)
//!     → connection.rs (track live connections for the drain)
//! ```

pub mod connection;
pub mod listener;
