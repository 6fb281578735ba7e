//! The consumer side of a subscription.

use crate::core::AirplaneState;
use crate::notify::Subscription;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;

/// Lazy, infinite sequence of states produced by one subscription.
///
/// When created by `get_and_observe`, the sampled value is held here and
/// yielded before anything from the channel, so it always comes first
/// regardless of how fast the host delivers events.
///
/// Cancelling (or dropping) the stream disposes the subscription. After
/// [`cancel`](Self::cancel) returns, no further element is yielded.
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
/// let mut stream = watcher.get_and_observe(Some(host.clone()))?.subscribe();
/// assert_eq!(stream.try_next(), Some(AirplaneState::Off));
///
/// host.set_airplane_mode(true);
/// assert_eq!(stream.try_next(), Some(AirplaneState::On));
///
/// stream.cancel();
/// assert_eq!(stream.try_next(), None);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct StateStream {
    initial: Option<AirplaneState>,
    receiver: mpsc::UnboundedReceiver<AirplaneState>,
    subscription: Subscription,
    cancelled: bool,
}

impl StateStream {
    pub(crate) fn new(
        initial: Option<AirplaneState>,
        receiver: mpsc::UnboundedReceiver<AirplaneState>,
        subscription: Subscription,
    ) -> Self {
        Self {
            initial,
            receiver,
            subscription,
            cancelled: false,
        }
    }

    /// Wait for the next state.
    ///
    /// Returns `None` once the stream is cancelled or the host has dropped
    /// the listener.
    pub async fn next(&mut self) -> Option<AirplaneState> {
        if self.cancelled {
            return None;
        }
        if let Some(state) = self.initial.take() {
            return Some(state);
        }
        self.receiver.recv().await
    }

    /// Take the next state if one is ready, without waiting.
    pub fn try_next(&mut self) -> Option<AirplaneState> {
        if self.cancelled {
            return None;
        }
        if let Some(state) = self.initial.take() {
            return Some(state);
        }
        self.receiver.try_recv().ok()
    }

    /// Block the current thread until the next state arrives.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_next(&mut self) -> Option<AirplaneState> {
        if self.cancelled {
            return None;
        }
        if let Some(state) = self.initial.take() {
            return Some(state);
        }
        self.receiver.blocking_recv()
    }

    /// Stop the stream and dispose its subscription.
    ///
    /// Safe to call repeatedly and from any thread that owns the stream.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.initial = None;
        self.receiver.close();
        self.subscription.dispose();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// The underlying subscription.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl Stream for StateStream {
    type Item = AirplaneState;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.cancelled {
            return Poll::Ready(None);
        }
        if let Some(state) = this.initial.take() {
            return Poll::Ready(Some(state));
        }
        this.receiver.poll_recv(cx)
    }
}

impl Drop for StateStream {
    fn drop(&mut self) {
        self.cancel();
    }
}
