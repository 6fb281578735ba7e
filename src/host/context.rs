//! The host capability trait.

use super::{EventFilter, EventListener};
use crate::error::HostError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw host identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which settings table a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingScope {
    /// Device-wide settings (newer platforms).
    Global,
    /// Per-user system settings (older platforms).
    System,
}

/// Capabilities a host platform exposes to the watcher.
///
/// Implementations must be shareable across threads: listeners may be
/// invoked from any thread, while [`unregister_listener`](Self::unregister_listener)
/// is only ever called from the control thread.
pub trait HostContext: Send + Sync {
    /// Platform API level, used to pick the settings table.
    fn platform_version(&self) -> u32;

    /// Synchronously read an integer setting. `None` when the key is absent.
    fn read_int_setting(&self, scope: SettingScope, key: &str) -> Option<i64>;

    /// Register a listener for every event matching `filter`.
    fn register_listener(
        &self,
        filter: &EventFilter,
        listener: Arc<dyn EventListener>,
    ) -> ListenerId;

    /// Remove a registered listener.
    ///
    /// # Errors
    ///
    /// Fails when `id` is not currently registered, e.g. on a second call.
    fn unregister_listener(&self, id: ListenerId) -> std::result::Result<(), HostError>;
}

impl<T: HostContext + ?Sized> HostContext for Arc<T> {
    fn platform_version(&self) -> u32 {
        (**self).platform_version()
    }

    fn read_int_setting(&self, scope: SettingScope, key: &str) -> Option<i64> {
        (**self).read_int_setting(scope, key)
    }

    fn register_listener(
        &self,
        filter: &EventFilter,
        listener: Arc<dyn EventListener>,
    ) -> ListenerId {
        (**self).register_listener(filter, listener)
    }

    fn unregister_listener(&self, id: ListenerId) -> std::result::Result<(), HostError> {
        (**self).unregister_listener(id)
    }
}
