//! Watcher metrics tracking using OpenTelemetry.

use crate::error::WatchError;
use crate::report::ErrorReporter;
use opentelemetry::metrics::{Counter, Meter, UpDownCounter};
use std::sync::Arc;

/// Metrics collector for watcher operations.
///
/// # Examples
///
/// ```rust,no_run
/// use airplane_mode_watch::metrics::WatcherMetrics;
/// use opentelemetry::global;
///
/// let metrics = WatcherMetrics::new(global::meter("airplane-mode-watch"));
/// metrics.record_activation();
/// metrics.record_event();
/// metrics.record_teardown();
/// ```
#[derive(Clone)]
pub struct WatcherMetrics {
    activations: Counter<u64>,
    active_subscriptions: UpDownCounter<i64>,
    events: Counter<u64>,
    teardowns: Counter<u64>,
    teardown_failures: Counter<u64>,
}

impl WatcherMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let activations = meter
            .u64_counter("airplane_mode_watch.activations")
            .with_description("Number of subscriptions activated")
            .build();

        let active_subscriptions = meter
            .i64_up_down_counter("airplane_mode_watch.subscriptions.active")
            .with_description("Number of subscriptions not yet disposed")
            .build();

        let events = meter
            .u64_counter("airplane_mode_watch.events")
            .with_description("State-change events delivered to subscribers")
            .build();

        let teardowns = meter
            .u64_counter("airplane_mode_watch.teardowns")
            .with_description("Number of subscriptions disposed")
            .build();

        let teardown_failures = meter
            .u64_counter("airplane_mode_watch.teardown.failures")
            .with_description("Number of failed listener unregistrations")
            .build();

        Self {
            activations,
            active_subscriptions,
            events,
            teardowns,
            teardown_failures,
        }
    }

    /// Record a listener registration.
    pub fn record_activation(&self) {
        self.activations.add(1, &[]);
        self.active_subscriptions.add(1, &[]);
    }

    /// Record one delivered state change.
    pub fn record_event(&self) {
        self.events.add(1, &[]);
    }

    /// Record a subscription being disposed.
    pub fn record_teardown(&self) {
        self.teardowns.add(1, &[]);
        self.active_subscriptions.add(-1, &[]);
    }

    /// Record a failed unregistration.
    pub fn record_teardown_failure(&self) {
        self.teardown_failures.add(1, &[]);
    }
}

/// Reporter that counts teardown failures before delegating.
pub(crate) struct MeteredReporter {
    pub(crate) inner: Arc<dyn ErrorReporter>,
    pub(crate) metrics: WatcherMetrics,
}

impl ErrorReporter for MeteredReporter {
    fn report(&self, error: &WatchError) {
        if error.is_teardown_failure() {
            self.metrics.record_teardown_failure();
        }
        self.inner.report(error);
    }
}
