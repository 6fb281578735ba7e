//! Built-in metrics for watcher activity.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Activations and currently active subscriptions
//! - Delivered state-change events
//! - Teardowns and teardown failures
//!
//! # Examples
//!
//! ```rust,no_run
//! use airplane_mode_watch::prelude::*;
//! use opentelemetry::global;
//!
//! # fn example() -> Result<()> {
//! let watcher = AirplaneModeWatcher::builder()
//!     .with_metrics(global::meter("my-app"))
//!     .build()?;
//! # let _ = watcher;
//! # Ok(())
//! # }
//! ```

mod watcher_metrics;

pub use watcher_metrics::WatcherMetrics;
pub(crate) use watcher_metrics::MeteredReporter;
