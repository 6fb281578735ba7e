//! One active listener registration and its guarded teardown.

use crate::dispatch::{self, ControlDispatcher};
use crate::error::WatchError;
use crate::host::{HostContext, ListenerId};
use crate::report::ErrorReporter;
use crate::telemetry::Telemetry;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Attempt to unregister `listener` once, reporting instead of failing.
///
/// Returns `true` when the host accepted the call. A failure, such as a
/// listener that was already removed, is sent to `reporter` as
/// [`WatchError::TeardownFailure`].
pub fn try_to_unregister(
    context: &dyn HostContext,
    listener: ListenerId,
    reporter: &dyn ErrorReporter,
) -> bool {
    match context.unregister_listener(listener) {
        Ok(()) => {
            tracing::debug!(listener = %listener, "unregistered listener");
            true
        }
        Err(e) => {
            reporter.report(&WatchError::TeardownFailure {
                listener,
                reason: e.to_string(),
            });
            false
        }
    }
}

struct SubscriptionInner {
    listener: ListenerId,
    context: Arc<dyn HostContext>,
    dispatcher: Arc<dyn ControlDispatcher>,
    reporter: Arc<dyn ErrorReporter>,
    /// Shared with the listener; set once teardown starts.
    closed: Arc<AtomicBool>,
    disposed: AtomicBool,
    telemetry: Telemetry,
}

/// Handle to one active registration with the host.
///
/// Disposal moves the subscription from active to disposed exactly once:
/// the first [`dispose`](Self::dispose) wins a compare-and-swap and
/// schedules the unregister call on the control thread; every later call,
/// from any thread, is a no-op. Clones share the same state.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    pub(crate) fn new(
        listener: ListenerId,
        context: Arc<dyn HostContext>,
        dispatcher: Arc<dyn ControlDispatcher>,
        reporter: Arc<dyn ErrorReporter>,
        closed: Arc<AtomicBool>,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                listener,
                context,
                dispatcher,
                reporter,
                closed,
                disposed: AtomicBool::new(false),
                telemetry,
            }),
        }
    }

    /// The host-assigned listener handle.
    pub fn listener_id(&self) -> ListenerId {
        self.inner.listener
    }

    /// Whether teardown has been requested.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Stop delivery and unregister the listener on the control thread.
    ///
    /// The listener stops emitting before this returns. The unregister call
    /// runs inline when the caller is on the control thread and is queued
    /// otherwise. If the control thread is gone, or the host rejects the
    /// call, the failure is reported and swallowed.
    pub fn dispose(&self) {
        let inner = &self.inner;
        if inner
            .disposed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        inner.closed.store(true, Ordering::Release);
        inner.telemetry.record_teardown();

        let listener = inner.listener;
        let context = Arc::clone(&inner.context);
        let reporter = Arc::clone(&inner.reporter);
        let dispatched = dispatch::run_on_control_thread(&*inner.dispatcher, move || {
            try_to_unregister(&*context, listener, &*reporter);
        });

        if let Err(e) = dispatched {
            inner.reporter.report(&WatchError::TeardownFailure {
                listener,
                reason: format!("Could not unregister receiver on control thread: {}", e),
            });
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("listener", &self.inner.listener)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ControlThread;
    use crate::host::{Event, EventFilter, EventListener, SimulatedHost};
    use parking_lot::Mutex;
    use std::sync::mpsc;
    use std::thread;

    struct Noop;

    impl EventListener for Noop {
        fn on_event(&self, _event: &Event) {}
    }

    fn collecting() -> (Arc<Mutex<Vec<String>>>, Arc<dyn ErrorReporter>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, Arc::new(move |e: &WatchError| sink.lock().push(e.to_string())))
    }

    fn wait_for_control(control: &ControlThread) {
        let (tx, rx) = mpsc::channel();
        control.schedule(Box::new(move || tx.send(()).unwrap())).unwrap();
        rx.recv().unwrap();
    }

    #[test]
    fn test_try_to_unregister_twice_reports_second() {
        let host = SimulatedHost::new();
        let id = host.register_listener(&EventFilter::new(), Arc::new(Noop));
        let (seen, reporter) = collecting();

        assert!(try_to_unregister(&host, id, &*reporter));
        assert!(!try_to_unregister(&host, id, &*reporter));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("is not registered"));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let host = Arc::new(SimulatedHost::new());
        let id = host.register_listener(&EventFilter::new(), Arc::new(Noop));
        let control = Arc::new(ControlThread::spawn("dispose-test").unwrap());
        let (seen, reporter) = collecting();
        let closed = Arc::new(AtomicBool::new(false));

        let subscription = Subscription::new(
            id,
            host.clone(),
            control.clone(),
            reporter,
            Arc::clone(&closed),
            Telemetry::default(),
        );

        subscription.dispose();
        subscription.clone().dispose();
        wait_for_control(&control);

        assert!(subscription.is_disposed());
        assert!(closed.load(Ordering::Acquire));
        assert!(!host.is_registered(id));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_concurrent_dispose_unregisters_once() {
        let host = Arc::new(SimulatedHost::new());
        let id = host.register_listener(&EventFilter::new(), Arc::new(Noop));
        let control = Arc::new(ControlThread::spawn("race-test").unwrap());
        let (seen, reporter) = collecting();
        let subscription = Subscription::new(
            id,
            host.clone(),
            control.clone(),
            reporter,
            Arc::new(AtomicBool::new(false)),
            Telemetry::default(),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = subscription.clone();
                thread::spawn(move || s.dispose())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        wait_for_control(&control);

        assert!(!host.is_registered(id));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_terminated_control_thread_is_reported() {
        let host = Arc::new(SimulatedHost::new());
        let id = host.register_listener(&EventFilter::new(), Arc::new(Noop));
        let control = Arc::new(ControlThread::spawn("dead").unwrap());
        control.shutdown();
        let (seen, reporter) = collecting();

        let subscription = Subscription::new(
            id,
            host.clone(),
            control,
            reporter,
            Arc::new(AtomicBool::new(false)),
            Telemetry::default(),
        );
        subscription.dispose();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("control thread has terminated"));
        // the listener could not be removed
        assert!(host.is_registered(id));
    }
}
