//! # airplane-mode-watch
//!
//! Watch an OS airplane-mode toggle and republish its state as a lazy stream.
//!
//! ## Overview
//!
//! `airplane-mode-watch` turns a push-based system broadcast into a pull-based
//! stream:
//! - One-shot reads of the stored setting (`get`, `is_airplane_mode_on`)
//! - Cold observations that register a listener only when subscribed
//! - `get_and_observe`, which always yields the current state first
//! - Teardown that unregisters exactly once, on a designated control thread
//!
//! The host platform is reached only through the [`host::HostContext`] trait.
//! [`host::SimulatedHost`] implements it in memory for tests and demos.
//!
//! ## Quick Start
//!
//! ```rust
//! use airplane_mode_watch::prelude::*;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<()> {
//! let watcher = AirplaneModeWatcher::create()?;
//! let host = Arc::new(SimulatedHost::new());
//!
//! let mut states = watcher.get_and_observe(Some(host.clone()))?.subscribe();
//! assert_eq!(states.try_next(), Some(AirplaneState::Off));
//!
//! host.set_airplane_mode(true);
//! assert_eq!(states.try_next(), Some(AirplaneState::On));
//!
//! // Unregisters the listener on the control thread
//! drop(states);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `metrics`: OpenTelemetry counters for activations, events and teardowns

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod notify;
pub mod report;

mod telemetry;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        AirplaneModeWatcher, AirplaneState, Observation, WatchTarget, WatcherBuilder,
        WatcherConfig,
    };
    pub use crate::error::{Result, WatchError};
    pub use crate::host::{HostContext, SimulatedHost};
    pub use crate::notify::{StateStream, Subscription};
    pub use crate::report::{ErrorReporter, LogReporter};
}
