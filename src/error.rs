//! Error types for airplane-mode-watch.

use crate::host::ListenerId;

/// Result type alias for airplane-mode-watch operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that can occur when reading or watching a system toggle.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// A required argument was absent.
    ///
    /// Raised synchronously, before any registration or setting read.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Unregistering a listener failed.
    ///
    /// Never returned to stream consumers; it is handed to the
    /// [`ErrorReporter`](crate::report::ErrorReporter) instead.
    #[error("Failed to unregister listener {listener}: {reason}")]
    TeardownFailure {
        /// Listener whose teardown failed
        listener: ListenerId,
        /// Why it failed
        reason: String,
    },

    /// Failed to load watcher configuration.
    #[error("Failed to load configuration: {0}")]
    Config(String),

    /// Watcher configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The control thread could not be started.
    #[error("Failed to spawn control thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl WatchError {
    /// Error for an absent host context.
    pub(crate) fn missing_context() -> Self {
        Self::InvalidArgument("context == null")
    }

    /// Returns true for [`WatchError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns true for [`WatchError::TeardownFailure`].
    pub fn is_teardown_failure(&self) -> bool {
        matches!(self, Self::TeardownFailure { .. })
    }
}

/// Errors raised by a host broadcast mechanism.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The listener is not (or no longer) registered.
    #[error("listener {0} is not registered")]
    NotRegistered(ListenerId),

    /// Host-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Errors raised when handing work to a control thread.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The control thread has shut down and accepts no more work.
    #[error("control thread has terminated")]
    Terminated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_context_message() {
        let err = WatchError::missing_context();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid argument: context == null");
    }

    #[test]
    fn test_teardown_failure_message() {
        let err = WatchError::TeardownFailure {
            listener: ListenerId::new(7),
            reason: HostError::NotRegistered(ListenerId::new(7)).to_string(),
        };
        assert!(err.is_teardown_failure());
        assert_eq!(
            err.to_string(),
            "Failed to unregister listener #7: listener #7 is not registered"
        );
    }
}
