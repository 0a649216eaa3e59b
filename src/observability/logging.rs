//! Injected logging capability.
//!
//! The lifecycle code logs through the [`Logger`] trait so callers decide
//! where breadcrumbs go. [`NopLogger`] is the default; [`TracingLogger`]
//! forwards to `tracing` events under the `gsrv` target.

use std::fmt;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter};

/// Logging capability used by [`Server`](crate::Server).
///
/// Implementations must never fail and must not block for long: they are
/// called on the serve path and from the shutdown watcher.
pub trait Logger: Send + Sync {
    /// Informational message built from free-form operands.
    fn info(&self, args: &[&dyn fmt::Display]);

    /// Debug message built from free-form operands.
    fn debug(&self, args: &[&dyn fmt::Display]);

    /// Informational message from a template, see [`format_args!`].
    fn info_fmt(&self, args: fmt::Arguments<'_>);

    /// Debug message from a template, see [`format_args!`].
    fn debug_fmt(&self, args: fmt::Arguments<'_>);
}

/// Logger that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn info(&self, _args: &[&dyn fmt::Display]) {}
    fn debug(&self, _args: &[&dyn fmt::Display]) {}
    fn info_fmt(&self, _args: fmt::Arguments<'_>) {}
    fn debug_fmt(&self, _args: fmt::Arguments<'_>) {}
}

/// Logger that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, args: &[&dyn fmt::Display]) {
        tracing::info!(target: "gsrv", "{}", Operands(args));
    }

    fn debug(&self, args: &[&dyn fmt::Display]) {
        tracing::debug!(target: "gsrv", "{}", Operands(args));
    }

    fn info_fmt(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "gsrv", "{}", args);
    }

    fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "gsrv", "{}", args);
    }
}

/// Displays operands back to back, without separators.
pub struct Operands<'a>(pub &'a [&'a dyn fmt::Display]);

impl fmt::Display for Operands<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arg in self.0 {
            write!(f, "{}", arg)?;
        }
        Ok(())
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init(level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gsrv={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every message as `(level, text)`.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryLogger {
        lines: Mutex<Vec<(&'static str, String)>>,
    }

    impl MemoryLogger {
        pub(crate) fn lines(&self) -> Vec<(&'static str, String)> {
            self.lines.lock().unwrap().clone()
        }

        fn push(&self, level: &'static str, line: String) {
            self.lines.lock().unwrap().push((level, line));
        }
    }

    impl Logger for MemoryLogger {
        fn info(&self, args: &[&dyn fmt::Display]) {
            self.push("info", Operands(args).to_string());
        }
        fn debug(&self, args: &[&dyn fmt::Display]) {
            self.push("debug", Operands(args).to_string());
        }
        fn info_fmt(&self, args: fmt::Arguments<'_>) {
            self.push("info", args.to_string());
        }
        fn debug_fmt(&self, args: fmt::Arguments<'_>) {
            self.push("debug", args.to_string());
        }
    }
}
