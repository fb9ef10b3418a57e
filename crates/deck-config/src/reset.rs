//! Daily reset scheduling.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_enabled() -> bool {
    true
}

/// Midnight local time, in the 6-field `sec min hour dom month dow` form.
fn default_cron() -> String {
    "0 0 0 * * *".to_string()
}

const fn default_run_on_startup() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResetConfig {
    /// Whether the recurring trigger runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Cron expression for the recurring trigger, evaluated in local time.
    #[serde(default = "default_cron")]
    pub cron: String,

    /// Run the "reset if not yet done today" check when the server starts.
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            cron: default_cron(),
            run_on_startup: default_run_on_startup(),
        }
    }
}

impl ResetConfig {
    /// Parse the configured cron expression.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the expression does not parse.
    pub fn schedule(&self) -> Result<cron::Schedule, ConfigError> {
        cron::Schedule::from_str(&self.cron).map_err(|e| ConfigError::InvalidValue {
            field: "reset.cron".to_string(),
            reason: e.to_string(),
        })
    }
}
