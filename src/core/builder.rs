//! Builder for constructing AirplaneModeWatcher instances.

use crate::core::watcher::Shared;
use crate::core::{AirplaneModeWatcher, SettingReader, WatcherConfig};
use crate::dispatch::{ControlDispatcher, ControlThread};
use crate::error::Result;
use crate::report::{ErrorReporter, LogReporter};
use crate::telemetry::Telemetry;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::{MeteredReporter, WatcherMetrics};

/// Builder for constructing an [`AirplaneModeWatcher`].
///
/// # Examples
///
/// ```rust
/// use airplane_mode_watch::prelude::*;
/// use airplane_mode_watch::dispatch::ControlThread;
/// use std::sync::Arc;
///
/// # fn example() -> Result<()> {
/// let control = Arc::new(ControlThread::spawn("ui")?);
///
/// let watcher = AirplaneModeWatcher::builder()
///     .with_config(WatcherConfig::default())
///     .with_dispatcher(control)
///     .with_reporter(Arc::new(|err: &WatchError| eprintln!("{err}")))
///     .build()?;
/// # let _ = watcher;
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct WatcherBuilder {
    config: WatcherConfig,
    dispatcher: Option<Arc<dyn ControlDispatcher>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    #[cfg(feature = "metrics")]
    meter: Option<opentelemetry::metrics::Meter>,
}

impl WatcherBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: WatcherConfig::default(),
            dispatcher: None,
            reporter: None,
            #[cfg(feature = "metrics")]
            meter: None,
        }
    }

    /// Use the given configuration instead of the defaults.
    pub fn with_config(mut self, config: WatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Run teardown on an existing control thread.
    ///
    /// Without this, `build` spawns a dedicated [`ControlThread`] named after
    /// `control_thread_name`.
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn ControlDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Send locally recovered errors to `reporter` instead of the log.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Record watcher metrics with the given OpenTelemetry meter.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, meter: opentelemetry::metrics::Meter) -> Self {
        self.meter = Some(meter);
        self
    }

    /// Build the watcher.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration fails validation
    /// - A control thread is needed and cannot be spawned
    pub fn build(self) -> Result<AirplaneModeWatcher> {
        self.config.validate()?;

        let dispatcher: Arc<dyn ControlDispatcher> = match self.dispatcher {
            Some(dispatcher) => dispatcher,
            None => Arc::new(ControlThread::spawn(self.config.control_thread_name.as_str())?),
        };
        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(LogReporter) as Arc<dyn ErrorReporter>);

        #[cfg(feature = "metrics")]
        let (reporter, telemetry) = match self.meter {
            Some(meter) => {
                let metrics = WatcherMetrics::new(meter);
                let reporter: Arc<dyn ErrorReporter> = Arc::new(MeteredReporter {
                    inner: reporter,
                    metrics: metrics.clone(),
                });
                (reporter, Telemetry::new(Some(metrics)))
            }
            None => (reporter, Telemetry::default()),
        };
        #[cfg(not(feature = "metrics"))]
        let telemetry = Telemetry::default();

        tracing::debug!(action = %self.config.target.action, "airplane mode watcher ready");

        Ok(AirplaneModeWatcher::from_shared(Shared {
            reader: SettingReader::new(Arc::new(self.config.target)),
            dispatcher,
            reporter,
            telemetry,
        }))
    }
}

impl Default for WatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
