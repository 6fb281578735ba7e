//! A dedicated OS thread acting as the control thread.

use super::{ControlDispatcher, Job};
use crate::error::DispatchError;
use crossbeam_channel::{Sender, unbounded};
use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{self, JoinHandle, ThreadId};

/// A named thread that runs queued jobs one at a time, in order.
///
/// A panicking job is logged and the thread keeps serving. After
/// [`shutdown`](Self::shutdown) (or drop) the queue is drained and further
/// [`schedule`](ControlDispatcher::schedule) calls fail with
/// [`DispatchError::Terminated`].
///
/// # Examples
///
/// ```rust
/// use airplane_mode_watch::dispatch::{ControlDispatcher, ControlThread};
///
/// let control = ControlThread::spawn("ui").unwrap();
/// assert!(!control.is_control_thread());
///
/// control.shutdown();
/// assert!(control.schedule(Box::new(|| {})).is_err());
/// ```
pub struct ControlThread {
    sender: Mutex<Option<Sender<Job>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    thread_id: ThreadId,
    name: String,
}

impl ControlThread {
    /// Start a control thread with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to create the thread.
    pub fn spawn(name: impl Into<String>) -> std::io::Result<Self> {
        let name = name.into();
        let (sender, receiver) = unbounded::<Job>();

        let thread_name = name.clone();
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            tracing::debug!(thread = %thread_name, "control thread started");
            for job in receiver {
                if catch_unwind(AssertUnwindSafe(job)).is_err() {
                    tracing::error!(thread = %thread_name, "control thread job panicked");
                }
            }
            tracing::debug!(thread = %thread_name, "control thread stopped");
        })?;

        Ok(Self {
            thread_id: handle.thread().id(),
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
            name,
        })
    }

    /// Identity of the control thread.
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Name given at spawn time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the thread still accepts jobs.
    pub fn is_running(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Stop accepting jobs, let queued ones finish and join the thread.
    ///
    /// Called from the control thread itself, this only closes the queue.
    pub fn shutdown(&self) {
        drop(self.sender.lock().take());

        if self.is_control_thread() {
            return;
        }
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!(thread = %self.name, "control thread exited with a panic");
            }
        }
    }
}

impl ControlDispatcher for ControlThread {
    fn is_control_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    fn schedule(&self, job: Job) -> Result<(), DispatchError> {
        let sender = self.sender.lock();
        let sender = sender.as_ref().ok_or(DispatchError::Terminated)?;
        sender.send(job).map_err(|_| DispatchError::Terminated)
    }
}

impl Drop for ControlThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::mpsc;

    #[test]
    fn test_jobs_run_in_order_on_control_thread() {
        let control = ControlThread::spawn("test-control").unwrap();
        let (tx, rx) = mpsc::channel();

        for i in 0..5 {
            let tx = tx.clone();
            control
                .schedule(Box::new(move || {
                    tx.send((i, thread::current().id())).unwrap();
                }))
                .unwrap();
        }

        for expected in 0..5 {
            let (i, id) = rx.recv().unwrap();
            assert_eq!(i, expected);
            assert_eq!(id, control.thread_id());
        }
    }

    #[test]
    fn test_thread_name() {
        let control = ControlThread::spawn("named-control").unwrap();
        let (tx, rx) = mpsc::channel();
        control
            .schedule(Box::new(move || {
                tx.send(thread::current().name().map(str::to_string)).unwrap();
            }))
            .unwrap();

        assert_eq!(rx.recv().unwrap().as_deref(), Some("named-control"));
        assert_eq!(control.name(), "named-control");
    }

    #[test]
    fn test_survives_panicking_job() {
        let control = ControlThread::spawn("panicky").unwrap();
        control.schedule(Box::new(|| panic!("boom"))).unwrap();

        let (tx, rx) = mpsc::channel();
        control.schedule(Box::new(move || tx.send(()).unwrap())).unwrap();
        assert!(rx.recv().is_ok());
    }

    #[test]
    fn test_shutdown_rejects_new_jobs() {
        let control = ControlThread::spawn("closing").unwrap();
        assert!(control.is_running());

        control.shutdown();

        assert!(!control.is_running());
        assert_eq!(
            control.schedule(Box::new(|| {})),
            Err(DispatchError::Terminated)
        );
        // second shutdown is harmless
        control.shutdown();
    }

    #[test]
    fn test_shutdown_from_control_thread_does_not_deadlock() {
        let control = Arc::new(ControlThread::spawn("self-stop").unwrap());
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&control);
        control
            .schedule(Box::new(move || {
                inner.shutdown();
                tx.send(inner.is_running()).unwrap();
            }))
            .unwrap();

        assert!(!rx.recv().unwrap());
    }
}
