//! Watcher configuration.

use crate::error::{Result, WatchError};
use crate::host::{ACTION_AIRPLANE_MODE_CHANGED, AIRPLANE_MODE_ON, EXTRA_STATE, SettingScope};
use config::{Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Environment prefix used by [`WatcherConfig::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "AIRPLANE_WATCH";

/// Describes which OS toggle to watch and how to read it.
///
/// The defaults describe airplane mode. Pointing these at another boolean
/// setting and its change broadcast reuses the whole watcher unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WatchTarget {
    /// Broadcast action announcing a change.
    pub action: String,
    /// Event extra holding the new boolean state.
    pub state_field: String,
    /// Setting key in the global table.
    pub global_setting_key: String,
    /// Setting key in the per-user system table.
    pub system_setting_key: String,
    /// First platform version that stores the flag in the global table.
    pub global_settings_since: u32,
    /// Stored value meaning "enabled".
    pub enabled_sentinel: i64,
}

impl WatchTarget {
    /// Where the flag lives on the given platform version.
    pub fn setting_location(&self, platform_version: u32) -> (SettingScope, &str) {
        if platform_version >= self.global_settings_since {
            (SettingScope::Global, &self.global_setting_key)
        } else {
            (SettingScope::System, &self.system_setting_key)
        }
    }
}

impl Default for WatchTarget {
    fn default() -> Self {
        Self {
            action: ACTION_AIRPLANE_MODE_CHANGED.to_string(),
            state_field: EXTRA_STATE.to_string(),
            global_setting_key: AIRPLANE_MODE_ON.to_string(),
            system_setting_key: AIRPLANE_MODE_ON.to_string(),
            global_settings_since: 17,
            enabled_sentinel: 1,
        }
    }
}

/// Top-level watcher configuration.
///
/// # Examples
///
/// ```rust
/// use airplane_mode_watch::core::WatcherConfig;
///
/// let config = WatcherConfig::default();
/// assert_eq!(config.target.state_field, "state");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// The toggle being watched.
    pub target: WatchTarget,
    /// Name of the control thread spawned when no dispatcher is supplied.
    pub control_thread_name: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            target: WatchTarget::default(),
            control_thread_name: "airplane-mode-control".to_string(),
        }
    }
}

impl WatcherConfig {
    /// Load from an optional file (YAML, TOML or JSON, by extension) with
    /// environment overrides on top.
    ///
    /// `PREFIX_CONTROL_THREAD_NAME=ui` sets `control_thread_name`, and
    /// `PREFIX_TARGET__ACTION=...` sets `target.action`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Config`] if the file cannot be read or parsed and
    /// [`WatchError::InvalidConfig`] if the result fails validation.
    pub fn load(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        Self::from_sources(path, Self::environment(env_prefix))
    }

    /// Load from `AIRPLANE_WATCH_*` environment variables only.
    ///
    /// # Errors
    ///
    /// See [`WatcherConfig::load`].
    pub fn from_env() -> Result<Self> {
        Self::load(None, DEFAULT_ENV_PREFIX)
    }

    fn environment(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub(crate) fn from_sources(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(env)
            .build()
            .map_err(|e| WatchError::Config(format!("Failed to build configuration: {}", e)))?
            .try_deserialize::<WatcherConfig>()
            .map_err(|e| {
                WatchError::Config(format!("Failed to deserialize configuration: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the watcher cannot act on.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("target.action", &self.target.action),
            ("target.state_field", &self.target.state_field),
            ("target.global_setting_key", &self.target.global_setting_key),
            ("target.system_setting_key", &self.target.system_setting_key),
            ("control_thread_name", &self.control_thread_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(WatchError::InvalidConfig(format!(
                    "Field '{}' must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}
