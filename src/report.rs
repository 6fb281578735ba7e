//! Reporting channel for errors that are recovered locally.

use crate::error::WatchError;

/// Sink for errors the watcher swallows instead of returning.
///
/// Teardown failures and unreachable control threads end up here. The
/// default [`LogReporter`] writes them to `tracing`; any
/// `Fn(&WatchError) + Send + Sync` closure can be used as well.
///
/// # Examples
///
/// ```rust
/// use airplane_mode_watch::prelude::*;
/// use std::sync::Arc;
///
/// let reporter: Arc<dyn ErrorReporter> = Arc::new(|err: &WatchError| {
///     eprintln!("watcher error: {err}");
/// });
/// # let _ = reporter;
/// ```
pub trait ErrorReporter: Send + Sync {
    /// Record an error.
    fn report(&self, error: &WatchError);
}

impl<F> ErrorReporter for F
where
    F: Fn(&WatchError) + Send + Sync,
{
    fn report(&self, error: &WatchError) {
        self(error)
    }
}

/// Reporter that logs every error at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &WatchError) {
        match error {
            WatchError::TeardownFailure { listener, reason } => {
                tracing::error!(listener = %listener, reason = %reason, "receiver was already unregistered");
            }
            other => tracing::error!(error = %other, "airplane mode watcher error"),
        }
    }
}
