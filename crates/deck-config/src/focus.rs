//! Focus session timing.

use deck_core::focus::DEFAULT_FOCUS_DURATION_SECS;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_duration_secs() -> u32 {
    DEFAULT_FOCUS_DURATION_SECS
}

const fn default_tick_millis() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FocusConfig {
    /// Countdown length of a focus session, in seconds.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,

    /// Wall-clock interval between countdown ticks. Each tick removes one
    /// second from the countdown, so anything other than 1000 only makes
    /// sense for demos and tests.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            tick_millis: default_tick_millis(),
        }
    }
}

impl FocusConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if either value is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "focus.duration_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::InvalidValue {
                field: "focus.tick_millis".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
