//! The watched on/off value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the watched mode is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirplaneState {
    /// The mode is enabled.
    On,
    /// The mode is disabled.
    Off,
}

impl AirplaneState {
    /// Returns true for [`AirplaneState::On`].
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for AirplaneState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl From<AirplaneState> for bool {
    fn from(state: AirplaneState) -> Self {
        state.is_on()
    }
}

impl fmt::Display for AirplaneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "on",
            Self::Off => "off",
        })
    }
}
