//! Running cleanup on a designated control thread.
//!
//! Some host APIs may only be called from one thread. [`run_on_control_thread`]
//! executes an action inline when the caller is already on that thread and
//! hands it to the [`ControlDispatcher`] otherwise. Nothing here knows about
//! watchers, so any resource with thread-affine release can use it.

mod control_thread;

pub use control_thread::ControlThread;

use crate::error::DispatchError;

/// A unit of work sent to the control thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Access to the control thread.
pub trait ControlDispatcher: Send + Sync {
    /// Whether the calling thread is the control thread.
    fn is_control_thread(&self) -> bool;

    /// Queue `job` on the control thread. Fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Terminated`] when the control thread no longer
    /// accepts work. The job is dropped without running.
    fn schedule(&self, job: Job) -> Result<(), DispatchError>;
}

impl<T: ControlDispatcher + ?Sized> ControlDispatcher for std::sync::Arc<T> {
    fn is_control_thread(&self) -> bool {
        (**self).is_control_thread()
    }

    fn schedule(&self, job: Job) -> Result<(), DispatchError> {
        (**self).schedule(job)
    }
}

/// Run `action` on the control thread: inline if already there, queued
/// otherwise.
///
/// # Errors
///
/// Propagates [`DispatchError`] from [`ControlDispatcher::schedule`].
///
/// # Examples
///
/// ```rust
/// use airplane_mode_watch::dispatch::{ControlThread, run_on_control_thread};
/// use std::sync::mpsc;
///
/// let control = ControlThread::spawn("control").unwrap();
/// let (tx, rx) = mpsc::channel();
///
/// run_on_control_thread(&control, move || {
///     tx.send(std::thread::current().id()).unwrap();
/// })
/// .unwrap();
///
/// assert_eq!(rx.recv().unwrap(), control.thread_id());
/// ```
pub fn run_on_control_thread<D, F>(dispatcher: &D, action: F) -> Result<(), DispatchError>
where
    D: ControlDispatcher + ?Sized,
    F: FnOnce() + Send + 'static,
{
    if dispatcher.is_control_thread() {
        action();
        Ok(())
    } else {
        tracing::debug!("marshalling action onto control thread");
        dispatcher.schedule(Box::new(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Dispatcher that claims every thread is the control thread when `here` is set.
    struct Fixed {
        here: bool,
        scheduled: AtomicUsize,
        terminated: AtomicBool,
    }

    impl Fixed {
        fn new(here: bool) -> Self {
            Self {
                here,
                scheduled: AtomicUsize::new(0),
                terminated: AtomicBool::new(false),
            }
        }
    }

    impl ControlDispatcher for Fixed {
        fn is_control_thread(&self) -> bool {
            self.here
        }

        fn schedule(&self, job: Job) -> Result<(), DispatchError> {
            if self.terminated.load(Ordering::SeqCst) {
                return Err(DispatchError::Terminated);
            }
            self.scheduled.fetch_add(1, Ordering::SeqCst);
            job();
            Ok(())
        }
    }

    #[test]
    fn test_runs_inline_on_control_thread() {
        let dispatcher = Fixed::new(true);
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);

        run_on_control_thread(&dispatcher, move || flag.store(true, Ordering::SeqCst)).unwrap();

        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(dispatcher.scheduled.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_schedules_from_other_thread() {
        let dispatcher = Fixed::new(false);
        run_on_control_thread(&dispatcher, || {}).unwrap();
        assert_eq!(dispatcher.scheduled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_terminated_dispatcher_drops_job() {
        let dispatcher = Fixed::new(false);
        dispatcher.terminated.store(true, Ordering::SeqCst);
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);

        let result = run_on_control_thread(&dispatcher, move || flag.store(true, Ordering::SeqCst));

        assert_eq!(result, Err(DispatchError::Terminated));
        assert!(!ran.load(Ordering::SeqCst));
    }
}
