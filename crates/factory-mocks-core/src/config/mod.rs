//! Mock definition files.
//!
//! A mock file declares response settings and a list of "any request" mocks:
//!
//! ```yaml
//! settings:
//!   responseTime: 10
//! mocks:
//!   - type: POST
//!     url: /api/login
//!     status: 201
//!     responseText: { token: abc }
//! ```

pub mod error;
pub mod parser;

use crate::mocks::request::AnyRequestOptions;
use crate::types::method::HttpMethod;
use crate::types::params::ParamsMatcher;
use crate::types::settings::SettingsUpdate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::ConfigError;
pub use parser::{load_mock_file, load_mock_files};

/// One mock declared in a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MockDefinition {
    /// HTTP method, `GET` when unset
    #[serde(default, rename = "type")]
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub response_text: Value,
    /// Query parameters the request must include (or a `${...}` expression)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<ParamsMatcher>,
}

impl MockDefinition {
    pub fn into_options(self) -> AnyRequestOptions {
        AnyRequestOptions {
            method: self.method,
            url: self.url,
            response_text: self.response_text,
            status: self.status,
        }
    }
}

/// Parsed contents of one or more mock files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MockFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsUpdate>,
    #[serde(default)]
    pub mocks: Vec<MockDefinition>,
}

impl MockFile {
    /// Append `other`'s mocks; its settings override ours key by key.
    pub fn merge(&mut self, other: MockFile) {
        if let Some(update) = other.settings {
            let settings = self.settings.get_or_insert_with(SettingsUpdate::default);
            if update.response_time.is_some() {
                settings.response_time = update.response_time;
            }
            if update.log_level.is_some() {
                settings.log_level = update.log_level;
            }
        }
        self.mocks.extend(other.mocks);
    }
}
