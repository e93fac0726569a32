//! Notifier configuration.
//!
//! The crate is embedded in a host platform, so configuration is deliberately
//! small: the push action string, which device types count as paired phones,
//! and the display aliases for device states. Defaults match the shipped
//! mobile apps; `from_env` lets a deployment override them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::DeviceType;

/// Intent action phones dispatch event notifications on.
pub const DEFAULT_EVENT_ACTION: &str = "com.parse.anydevice.EVENT";

const ENV_EVENT_ACTION: &str = "DEVICECAST_EVENT_ACTION";
const ENV_PAIRED_DEVICE_TYPES: &str = "DEVICECAST_PAIRED_DEVICE_TYPES";

/// Configuration for the [`PairingNotifier`](crate::PairingNotifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Device types that receive event fanout pushes.
    pub paired_device_types: Vec<DeviceType>,
    /// `action` field of the structured event push payload.
    pub event_action: String,
    /// Raw state value -> display form used in alert text.
    pub state_aliases: HashMap<String, String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            paired_device_types: vec![DeviceType::Ios, DeviceType::Android],
            event_action: DEFAULT_EVENT_ACTION.to_string(),
            state_aliases: HashMap::from([("blink".to_string(), "blinking".to_string())]),
        }
    }
}

impl NotifierConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Reads `DEVICECAST_EVENT_ACTION` and `DEVICECAST_PAIRED_DEVICE_TYPES`
    /// (comma-separated) after a best-effort `.env` load.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(
            std::env::var(ENV_EVENT_ACTION).ok(),
            std::env::var(ENV_PAIRED_DEVICE_TYPES).ok(),
        )
    }

    /// Map the display form of a device state ("blink" -> "blinking").
    /// States without an alias pass through unchanged.
    pub fn display_state<'a>(&'a self, state: &'a str) -> &'a str {
        self.state_aliases
            .get(state)
            .map(String::as_str)
            .unwrap_or(state)
    }

    fn from_vars(
        event_action: Option<String>,
        paired_device_types: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(action) = event_action {
            if action.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_EVENT_ACTION.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            config.event_action = action;
        }

        if let Some(types) = paired_device_types {
            let parsed: Vec<DeviceType> = types
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| DeviceType::from(s.to_string()))
                .collect();
            if parsed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_PAIRED_DEVICE_TYPES.to_string(),
                    message: "expected a comma-separated list of device types".to_string(),
                });
            }
            config.paired_device_types = parsed;
        }

        Ok(config)
    }
}
