//! Broadcast events, filters and listeners.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A typed value attached to an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extra {
    /// Boolean extra
    Bool(bool),
    /// Integer extra
    Int(i64),
    /// String extra
    Str(String),
}

impl From<bool> for Extra {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Extra {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Extra {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// A one-way broadcast delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    action: String,
    #[serde(default)]
    extras: HashMap<String, Extra>,
}

impl Event {
    /// Create an event with no extras.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: HashMap::new(),
        }
    }

    /// Attach an extra.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Extra>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// The broadcast action.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Look up a raw extra.
    pub fn extra(&self, key: &str) -> Option<&Extra> {
        self.extras.get(key)
    }

    /// Read a boolean extra, falling back to `default` when it is missing
    /// or holds another type.
    pub fn bool_extra(&self, key: &str, default: bool) -> bool {
        match self.extras.get(key) {
            Some(Extra::Bool(value)) => *value,
            _ => default,
        }
    }
}

/// Ordered set of actions a listener wants to receive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    actions: Vec<String>,
}

impl EventFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action. Duplicates are ignored.
    pub fn add_action(&mut self, action: impl Into<String>) {
        let action = action.into();
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    /// The action at `index`, in insertion order.
    pub fn action(&self, index: usize) -> Option<&str> {
        self.actions.get(index).map(String::as_str)
    }

    /// Number of actions.
    pub fn count_actions(&self) -> usize {
        self.actions.len()
    }

    /// Whether `event` carries one of this filter's actions.
    pub fn matches(&self, event: &Event) -> bool {
        self.actions.iter().any(|a| a == event.action())
    }
}

/// Callback the host invokes for every matching event.
///
/// May be called from any thread, possibly concurrently.
pub trait EventListener: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &Event);
}
