//! In-memory host for tests and demos.

use super::{
    ACTION_AIRPLANE_MODE_CHANGED, AIRPLANE_MODE_ON, EXTRA_STATE, Event, EventFilter,
    EventListener, HostContext, ListenerId, SettingScope,
};
use crate::error::HostError;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Platform version reported by [`SimulatedHost::new`].
pub const DEFAULT_PLATFORM_VERSION: u32 = 34;

#[derive(Clone)]
struct Registration {
    id: ListenerId,
    filter: EventFilter,
    listener: Arc<dyn EventListener>,
}

/// A [`HostContext`] that keeps settings and listeners in memory.
///
/// Broadcasts are delivered synchronously on the calling thread, so a
/// test can fire an event from any thread it likes. The registration
/// table is an `ArcSwap` snapshot: [`broadcast`](Self::broadcast) never
/// takes a lock, and a listener may unregister itself while being
/// invoked.
///
/// Like a real platform, unregistering an unknown listener fails.
///
/// # Examples
///
/// ```rust
/// use airplane_mode_watch::host::{HostContext, SettingScope, SimulatedHost};
///
/// let host = SimulatedHost::new();
/// host.put_setting(SettingScope::Global, "airplane_mode_on", 1);
/// assert_eq!(host.read_int_setting(SettingScope::Global, "airplane_mode_on"), Some(1));
/// ```
pub struct SimulatedHost {
    platform_version: u32,
    settings: Mutex<HashMap<(SettingScope, String), i64>>,
    registrations: ArcSwap<Vec<Registration>>,
    next_id: AtomicU64,
}

impl SimulatedHost {
    /// Create a host with no stored settings and no listeners.
    pub fn new() -> Self {
        Self::with_platform_version(DEFAULT_PLATFORM_VERSION)
    }

    /// Create a host reporting the given platform version.
    pub fn with_platform_version(platform_version: u32) -> Self {
        Self {
            platform_version,
            settings: Mutex::new(HashMap::new()),
            registrations: ArcSwap::from_pointee(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store an integer setting.
    pub fn put_setting(&self, scope: SettingScope, key: impl Into<String>, value: i64) {
        self.settings.lock().insert((scope, key.into()), value);
    }

    /// Remove a setting, returning its previous value.
    pub fn remove_setting(&self, scope: SettingScope, key: &str) -> Option<i64> {
        self.settings.lock().remove(&(scope, key.to_string()))
    }

    /// Deliver `event` to every listener whose filter matches it.
    ///
    /// Returns the number of listeners invoked.
    pub fn broadcast(&self, event: &Event) -> usize {
        let snapshot = self.registrations.load_full();
        let mut delivered = 0;
        for registration in snapshot.iter().filter(|r| r.filter.matches(event)) {
            registration.listener.on_event(event);
            delivered += 1;
        }
        tracing::trace!(action = %event.action(), delivered, "simulated broadcast");
        delivered
    }

    /// Flip airplane mode the way the platform does: write the setting,
    /// then broadcast the change.
    pub fn set_airplane_mode(&self, on: bool) -> usize {
        let scope = if self.platform_version >= 17 {
            SettingScope::Global
        } else {
            SettingScope::System
        };
        self.put_setting(scope, AIRPLANE_MODE_ON, i64::from(on));
        self.broadcast(&Event::new(ACTION_AIRPLANE_MODE_CHANGED).with_extra(EXTRA_STATE, on))
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registrations.load().len()
    }

    /// Filters of all registered listeners, in registration order.
    pub fn registered_filters(&self) -> Vec<EventFilter> {
        self.registrations
            .load()
            .iter()
            .map(|r| r.filter.clone())
            .collect()
    }

    /// Whether `id` is currently registered.
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.registrations.load().iter().any(|r| r.id == id)
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostContext for SimulatedHost {
    fn platform_version(&self) -> u32 {
        self.platform_version
    }

    fn read_int_setting(&self, scope: SettingScope, key: &str) -> Option<i64> {
        self.settings.lock().get(&(scope, key.to_string())).copied()
    }

    fn register_listener(
        &self,
        filter: &EventFilter,
        listener: Arc<dyn EventListener>,
    ) -> ListenerId {
        let id = ListenerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let registration = Registration {
            id,
            filter: filter.clone(),
            listener,
        };
        self.registrations.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(registration.clone());
            next
        });
        id
    }

    fn unregister_listener(&self, id: ListenerId) -> Result<(), HostError> {
        let mut found = false;
        self.registrations.rcu(|current| {
            found = current.iter().any(|r| r.id == id);
            current
                .iter()
                .filter(|r| r.id != id)
                .cloned()
                .collect::<Vec<_>>()
        });
        if found {
            Ok(())
        } else {
            Err(HostError::NotRegistered(id))
        }
    }
}
