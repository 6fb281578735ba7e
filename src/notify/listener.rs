//! Listener turning host broadcasts into stream elements.

use crate::core::AirplaneState;
use crate::host::{Event, EventListener};
use crate::telemetry::Telemetry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Emits the state carried by each event into one subscription's channel.
///
/// Runs on whatever thread the host delivers on. Once `closed` is set the
/// listener drops events, so nothing leaks past a cancelled subscription.
pub(crate) struct StateListener {
    state_field: String,
    sender: mpsc::UnboundedSender<AirplaneState>,
    closed: Arc<AtomicBool>,
    telemetry: Telemetry,
}

impl StateListener {
    pub(crate) fn new(
        state_field: impl Into<String>,
        sender: mpsc::UnboundedSender<AirplaneState>,
        closed: Arc<AtomicBool>,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            state_field: state_field.into(),
            sender,
            closed,
            telemetry,
        }
    }
}

impl EventListener for StateListener {
    fn on_event(&self, event: &Event) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }

        let state = AirplaneState::from(event.bool_extra(&self.state_field, false));
        // a closed receiver means teardown is already on its way
        if self.sender.send(state).is_ok() {
            self.telemetry.record_event();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener() -> (
        StateListener,
        mpsc::UnboundedReceiver<AirplaneState>,
        Arc<AtomicBool>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let listener = StateListener::new("state", tx, Arc::clone(&closed), Telemetry::default());
        (listener, rx, closed)
    }

    #[test]
    fn test_emits_state_extra() {
        let (listener, mut rx, _closed) = listener();
        listener.on_event(&Event::new("x").with_extra("state", true));
        listener.on_event(&Event::new("x").with_extra("state", false));

        assert_eq!(rx.try_recv().unwrap(), AirplaneState::On);
        assert_eq!(rx.try_recv().unwrap(), AirplaneState::Off);
    }

    #[test]
    fn test_missing_extra_is_off() {
        let (listener, mut rx, _closed) = listener();
        listener.on_event(&Event::new("x"));
        assert_eq!(rx.try_recv().unwrap(), AirplaneState::Off);
    }

    #[test]
    fn test_closed_listener_drops_events() {
        let (listener, mut rx, closed) = listener();
        closed.store(true, Ordering::Release);
        listener.on_event(&Event::new("x").with_extra("state", true));
        assert!(rx.try_recv().is_err());
    }
}
