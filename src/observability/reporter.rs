//! Reporting of failed configuration loads.

use crate::config::loader::LoadError;

/// Receives load failures for observability.
///
/// Reporting is fire-and-forget: nothing a reporter does can change what the
/// loader returns.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &LoadError);
}

/// Reports failures as `tracing` error events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &LoadError) {
        tracing::error!(kind = error.kind(), error = %error, "Failed to load configuration");
    }
}
