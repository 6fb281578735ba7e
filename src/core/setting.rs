//! One-shot reads of the stored toggle.

use crate::core::{AirplaneState, WatchTarget};
use crate::error::{Result, WatchError};
use crate::host::HostContext;
use std::sync::Arc;

/// Samples the current value of the watched setting.
///
/// Stateless apart from the immutable [`WatchTarget`]; clones share it.
#[derive(Debug, Clone)]
pub struct SettingReader {
    target: Arc<WatchTarget>,
}

impl SettingReader {
    /// Create a reader for `target`.
    pub fn new(target: Arc<WatchTarget>) -> Self {
        Self { target }
    }

    /// Read the setting once.
    ///
    /// Newer platforms keep the flag in the global table, older ones in the
    /// per-user system table. The result is [`AirplaneState::On`] only when
    /// the stored value equals the enabled sentinel; a missing key reads as
    /// [`AirplaneState::Off`].
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidArgument`] when `context` is `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use airplane_mode_watch::core::{AirplaneState, SettingReader, WatchTarget};
    /// use airplane_mode_watch::host::SimulatedHost;
    /// use std::sync::Arc;
    ///
    /// let reader = SettingReader::new(Arc::new(WatchTarget::default()));
    /// let host = SimulatedHost::new();
    /// assert_eq!(reader.read(Some(&host)).unwrap(), AirplaneState::Off);
    /// assert!(reader.read(None::<&SimulatedHost>).is_err());
    /// ```
    pub fn read<C>(&self, context: Option<&C>) -> Result<AirplaneState>
    where
        C: HostContext + ?Sized,
    {
        let context = context.ok_or_else(WatchError::missing_context)?;
        let (scope, key) = self.target.setting_location(context.platform_version());
        let enabled = context
            .read_int_setting(scope, key)
            .is_some_and(|stored| stored == self.target.enabled_sentinel);
        Ok(AirplaneState::from(enabled))
    }

    /// The target this reader samples.
    pub fn target(&self) -> &WatchTarget {
        &self.target
    }
}
