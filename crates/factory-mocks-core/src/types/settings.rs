//! Request manager settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings applied to every mocked response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Simulated latency in milliseconds before a matched request settles
    pub response_time: u32,
    /// Verbosity of request traffic logging (0 = quiet)
    pub log_level: u8,
}

impl Settings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(u64::from(self.response_time))
    }

    /// Apply a partial update, keeping values for keys that are not provided.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(response_time) = update.response_time {
            self.response_time = response_time;
        }
        if let Some(log_level) = update.log_level {
            self.log_level = log_level;
        }
    }
}

/// Partial settings, as accepted by `mock_setup`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<u8>,
}

impl SettingsUpdate {
    pub fn response_time(response_time: u32) -> Self {
        Self {
            response_time: Some(response_time),
            log_level: None,
        }
    }

    pub fn log_level(log_level: u8) -> Self {
        Self {
            response_time: None,
            log_level: Some(log_level),
        }
    }
}
