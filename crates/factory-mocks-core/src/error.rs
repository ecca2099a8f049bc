//! Errors raised while configuring mocks and while answering requests.

use crate::mocks::request::MockId;
use crate::types::method::HttpMethod;
use serde_json::Value;
use thiserror::Error;

/// Mock configuration error, raised synchronously at setup time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MockError {
    /// Failure status outside 300..=599
    #[error("Invalid failure status {0}: must be 3XX, 4XX or 5XX")]
    InvalidStatus(u16),
    /// Error conversion requested for a response without a flat `errors` mapping
    #[error("Cannot convert errors: response must be an object with an `errors` field mapping attributes to messages")]
    MalformedErrors,
    /// No mock registered under this id
    #[error("Mock not found: {0}")]
    UnknownMock(MockId),
}

/// Outcome of a mocked request that did not succeed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// No enabled mock matches the request
    #[error("No mock found for {method} {url}")]
    NoMockFound { method: HttpMethod, url: String },
    /// The matched mock is configured to fail
    #[error("Mocked request failed with status {status}")]
    Failed { status: u16, payload: Value },
}

impl RequestError {
    /// HTTP status carried by a failed response.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Failed { status, .. } => Some(*status),
            RequestError::NoMockFound { .. } => None,
        }
    }

    /// Error payload carried by a failed response.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            RequestError::Failed { payload, .. } => Some(payload),
            RequestError::NoMockFound { .. } => None,
        }
    }
}
