//! Optional metrics hooks threaded through subscriptions.

#[cfg(feature = "metrics")]
use crate::metrics::WatcherMetrics;

/// Metrics sink that compiles to nothing without the `metrics` feature.
#[derive(Clone, Default)]
pub(crate) struct Telemetry {
    #[cfg(feature = "metrics")]
    metrics: Option<WatcherMetrics>,
}

impl Telemetry {
    #[cfg(feature = "metrics")]
    pub(crate) fn new(metrics: Option<WatcherMetrics>) -> Self {
        Self { metrics }
    }

    pub(crate) fn record_activation(&self) {
        #[cfg(feature = "metrics")]
        self.metrics.iter().for_each(WatcherMetrics::record_activation);
    }

    pub(crate) fn record_event(&self) {
        #[cfg(feature = "metrics")]
        self.metrics.iter().for_each(WatcherMetrics::record_event);
    }

    pub(crate) fn record_teardown(&self) {
        #[cfg(feature = "metrics")]
        self.metrics.iter().for_each(WatcherMetrics::record_teardown);
    }
}
