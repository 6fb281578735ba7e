//! Host capabilities the watcher depends on.
//!
//! The host owns event delivery and the settings store. The watcher only
//! talks to it through [`HostContext`], so a real platform binding and the
//! in-memory [`SimulatedHost`] are interchangeable.

mod context;
mod event;
mod simulated;

pub use context::{HostContext, ListenerId, SettingScope};
pub use event::{Event, EventFilter, EventListener, Extra};
pub use simulated::SimulatedHost;

/// Action broadcast by the platform when airplane mode changes.
pub const ACTION_AIRPLANE_MODE_CHANGED: &str = "android.intent.action.AIRPLANE_MODE";

/// Event extra carrying the new airplane mode state.
pub const EXTRA_STATE: &str = "state";

/// Setting key holding the airplane mode flag.
pub const AIRPLANE_MODE_ON: &str = "airplane_mode_on";
