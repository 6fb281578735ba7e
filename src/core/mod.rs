//! Core watcher types.

mod builder;
mod setting;
mod state;
mod watch_config;
mod watcher;

pub use builder::WatcherBuilder;
pub use setting::SettingReader;
pub use state::AirplaneState;
pub use watch_config::{DEFAULT_ENV_PREFIX, WatchTarget, WatcherConfig};
pub use watcher::{AirplaneModeWatcher, Observation};
