//! The watcher: one-shot reads plus cold, lazily activated observations.

use crate::core::{AirplaneState, SettingReader, WatcherBuilder};
use crate::dispatch::ControlDispatcher;
use crate::error::{Result, WatchError};
use crate::host::{EventFilter, HostContext, ListenerId};
use crate::notify::{self, StateListener, StateStream, Subscription};
use crate::report::ErrorReporter;
use crate::telemetry::Telemetry;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::mpsc;

/// State shared by a watcher, its clones and every observation it creates.
pub(crate) struct Shared {
    pub(crate) reader: SettingReader,
    pub(crate) dispatcher: Arc<dyn ControlDispatcher>,
    pub(crate) reporter: Arc<dyn ErrorReporter>,
    pub(crate) telemetry: Telemetry,
}

/// Watches the airplane mode toggle of a host.
///
/// Cheap to clone; clones share the control-thread dispatcher and the
/// error reporter.
///
/// # Examples
///
/// ```rust
/// use airplane_mode_watch::prelude::*;
/// use std::sync::Arc;
///
/// # fn example() -> Result<()> {
/// let watcher = AirplaneModeWatcher::create()?;
/// let host = Arc::new(SimulatedHost::new());
///
/// assert_eq!(watcher.get(Some(&*host))?, AirplaneState::Off);
///
/// let mut states = watcher.observe(Some(host.clone()))?.subscribe();
/// host.set_airplane_mode(true);
/// assert_eq!(states.blocking_next(), Some(AirplaneState::On));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone)]
pub struct AirplaneModeWatcher {
    shared: Arc<Shared>,
}

impl AirplaneModeWatcher {
    pub(crate) fn from_shared(shared: Shared) -> Self {
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Create a watcher with default configuration and its own control
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Spawn`] if the control thread cannot be started.
    pub fn create() -> Result<Self> {
        Self::builder().build()
    }

    /// Start building a customised watcher.
    pub fn builder() -> WatcherBuilder {
        WatcherBuilder::new()
    }

    /// Emit the current state first, then every change.
    ///
    /// The current value is sampled now, before any listener exists, and
    /// is the first element of every stream subscribed from the returned
    /// observation.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidArgument`] when `context` is `None`.
    pub fn get_and_observe<C>(&self, context: Option<Arc<C>>) -> Result<Observation>
    where
        C: HostContext + 'static,
    {
        let context = context.ok_or_else(WatchError::missing_context)?;
        let initial = self.shared.reader.read(Some(&*context))?;
        let mut observation = self.observe(Some(context))?;
        observation.initial = Some(initial);
        Ok(observation)
    }

    /// Observe changes of the toggle.
    ///
    /// Nothing is registered until [`Observation::subscribe`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidArgument`] when `context` is `None`.
    pub fn observe<C>(&self, context: Option<Arc<C>>) -> Result<Observation>
    where
        C: HostContext + 'static,
    {
        let context: Arc<dyn HostContext> = context.ok_or_else(WatchError::missing_context)?;
        Ok(Observation {
            context,
            filter: self.create_event_filter(),
            initial: None,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Sample the current state once.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidArgument`] when `context` is `None`.
    pub fn get<C>(&self, context: Option<&C>) -> Result<AirplaneState>
    where
        C: HostContext + ?Sized,
    {
        self.shared.reader.read(context)
    }

    /// Whether airplane mode is currently on, read from system settings.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidArgument`] when `context` is `None`.
    pub fn is_airplane_mode_on<C>(&self, context: Option<&C>) -> Result<bool>
    where
        C: HostContext + ?Sized,
    {
        self.get(context).map(AirplaneState::is_on)
    }

    /// Build the filter registered on activation.
    pub fn create_event_filter(&self) -> EventFilter {
        let mut filter = EventFilter::new();
        filter.add_action(self.shared.reader.target().action.as_str());
        filter
    }

    /// Unregister `listener` once, sending any failure to this watcher's
    /// reporter instead of returning it.
    pub fn try_to_unregister(&self, context: &dyn HostContext, listener: ListenerId) -> bool {
        notify::try_to_unregister(context, listener, &*self.shared.reporter)
    }
}

/// A cold, not yet activated observation of one host.
///
/// Each [`subscribe`](Self::subscribe) registers a fresh listener and
/// returns a stream owning it; subscriptions are independent of each other.
#[derive(Clone)]
pub struct Observation {
    context: Arc<dyn HostContext>,
    filter: EventFilter,
    initial: Option<AirplaneState>,
    shared: Arc<Shared>,
}

impl Observation {
    /// Activate: register a listener with the host and return its stream.
    pub fn subscribe(&self) -> StateStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let telemetry = self.shared.telemetry.clone();

        let listener = StateListener::new(
            self.shared.reader.target().state_field.as_str(),
            sender,
            Arc::clone(&closed),
            telemetry.clone(),
        );
        let id = self
            .context
            .register_listener(&self.filter, Arc::new(listener));
        telemetry.record_activation();
        tracing::debug!(listener = %id, action = ?self.filter.action(0), "registered listener");

        let subscription = Subscription::new(
            id,
            Arc::clone(&self.context),
            Arc::clone(&self.shared.dispatcher),
            Arc::clone(&self.shared.reporter),
            closed,
            telemetry,
        );
        StateStream::new(self.initial, receiver, subscription)
    }

    /// The filter each subscription registers.
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// The value sampled by `get_and_observe`, if any.
    pub fn initial(&self) -> Option<AirplaneState> {
        self.initial
    }
}
