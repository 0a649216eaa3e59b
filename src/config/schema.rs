//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::server::DEFAULT_TIMEOUT;

/// Root configuration for a served process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub address: String,

    /// Upper bound on the HTTP drain, in seconds.
    pub shutdown_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl ServerConfig {
    /// Drain bound as a [`Duration`].
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
            shutdown_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            log_level: "info".to_string(),
        }
    }
}
