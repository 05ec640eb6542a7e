//! Per-control settings persisted by the host
//!
//! The host owns storage; we only read the payload it delivers with each
//! event and hand back an updated copy after a successful volume change.

use serde::{Deserialize, Serialize};

/// Lowest level the device accepts on the TX path (dB)
pub const MIN_DB: i32 = -40;
/// Highest level the device accepts on the TX path (dB)
pub const MAX_DB: i32 = 40;

const DEFAULT_INCREMENT: i32 = 1;

fn default_increment() -> i32 {
    DEFAULT_INCREMENT
}

/// Settings shape as stored by the host: `{ count?, incrementBy?, ipAddress?, token? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSettings {
    /// Current level in dB
    #[serde(default)]
    pub count: i32,
    #[serde(default = "default_increment")]
    pub increment_by: i32,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub token: String,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            count: 0,
            increment_by: DEFAULT_INCREMENT,
            ip_address: String::new(),
            token: String::new(),
        }
    }
}

impl ControlSettings {
    /// Target level after `ticks` dial detents, always inside [MIN_DB, MAX_DB]
    pub fn rotated_level(&self, ticks: i32) -> i32 {
        let delta = self.increment_by.saturating_mul(ticks);
        clamp_level(self.count.saturating_add(delta))
    }

    /// Target level after a short key press.
    ///
    /// Unlike rotation this is not range-clamped; the device rejects
    /// out-of-range values with an `OutOfRange` status instead.
    pub fn stepped_level(&self) -> i32 {
        self.count.saturating_add(self.increment_by)
    }

    /// Address with surrounding whitespace removed
    pub fn address(&self) -> &str {
        self.ip_address.trim()
    }

    /// Bearer credential with surrounding whitespace removed
    pub fn bearer(&self) -> &str {
        self.token.trim()
    }

    /// Whether both the device address and credential are usable
    pub fn has_device(&self) -> bool {
        !self.address().is_empty() && !self.bearer().is_empty()
    }
}

/// Clamp a level into the device range
pub fn clamp_level(level: i32) -> i32 {
    level.clamp(MIN_DB, MAX_DB)
}
