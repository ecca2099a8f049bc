//! A single mocked HTTP call.

use crate::error::MockError;
use crate::matching::{params_match, payload_matches, url_matches};
use crate::mocks::errors::FailureOptions;
use crate::types::method::HttpMethod;
use crate::types::params::ParamsMatcher;
use crate::types::request::Request;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Registration handle of a mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MockId(pub u32);

impl fmt::Display for MockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a mock answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum Responder {
    Success { status: u16, body: Value },
    Failure { status: u16, payload: Value },
}

impl Responder {
    /// Pick success or failure from the status code.
    pub fn from_status(status: u16, body: Value) -> Self {
        if (200..300).contains(&status) {
            Responder::Success { status, body }
        } else {
            Responder::Failure {
                status,
                payload: body,
            }
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Responder::Success { status, .. } | Responder::Failure { status, .. } => *status,
        }
    }
}

/// Options for a mock answering any request, by method and URL only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnyRequestOptions {
    /// HTTP method, `GET` when unset
    #[serde(default, rename = "type")]
    pub method: HttpMethod,
    pub url: String,
    /// Response body
    #[serde(default)]
    pub response_text: Value,
    /// Response status, 200 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Mocked HTTP call: matching keys, canned response, and lifecycle flags.
///
/// A mock moves between enabled and disabled freely; destroying it is terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    id: MockId,
    method: HttpMethod,
    url: String,
    params: Option<ParamsMatcher>,
    payload: Option<Value>,
    responder: Responder,
    times_called: u32,
    enabled: bool,
    destroyed: bool,
}

impl MockRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: MockId(0),
            method,
            url: url.into(),
            params: None,
            payload: None,
            responder: Responder::Success {
                status: 200,
                body: Value::Object(Default::default()),
            },
            times_called: 0,
            enabled: true,
            destroyed: false,
        }
    }

    /// Mock that answers any request with the given method and URL.
    pub fn any(options: AnyRequestOptions) -> Self {
        let mut mock = Self::new(options.method, options.url);
        mock.responder = Responder::from_status(options.status.unwrap_or(200), options.response_text);
        mock
    }

    pub(crate) fn set_id(&mut self, id: MockId) {
        self.id = id;
    }

    pub fn id(&self) -> MockId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn params(&self) -> Option<&ParamsMatcher> {
        self.params.as_ref()
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    pub fn status(&self) -> u16 {
        self.responder.status()
    }

    /// Success payload, `None` while the mock is configured to fail.
    pub fn response(&self) -> Option<&Value> {
        match &self.responder {
            Responder::Success { body, .. } => Some(body),
            Responder::Failure { .. } => None,
        }
    }

    /// Error payload, `None` unless the mock is configured to fail.
    pub fn error_response(&self) -> Option<&Value> {
        match &self.responder {
            Responder::Failure { payload, .. } => Some(payload),
            Responder::Success { .. } => None,
        }
    }

    pub fn times_called(&self) -> u32 {
        self.times_called
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Only answer requests whose query parameters satisfy `matcher`.
    pub fn with_params(&mut self, matcher: ParamsMatcher) -> &mut Self {
        self.params = Some(matcher);
        self
    }

    /// Only answer requests whose body contains `payload` (or satisfies a `${...}` expression).
    pub fn matching(&mut self, payload: Value) -> &mut Self {
        self.payload = Some(payload);
        self
    }

    /// Answer with `json`. A failing mock switches back to a 200 response.
    pub fn returns(&mut self, json: Value) -> &mut Self {
        let status = match self.responder {
            Responder::Success { status, .. } => status,
            Responder::Failure { .. } => 200,
        };
        self.responder = Responder::Success { status, body: json };
        self
    }

    /// Answer with a failure.
    ///
    /// Fails when the status is not a 3XX, 4XX or 5XX code.
    pub fn fails(&mut self, options: FailureOptions) -> Result<&mut Self, MockError> {
        let status = options.status.unwrap_or(500);
        if !(300..=599).contains(&status) {
            return Err(MockError::InvalidStatus(status));
        }
        let payload = options
            .response
            .map(|response| response.into_payload())
            .unwrap_or(Value::Null);
        self.responder = Responder::Failure { status, payload };
        Ok(self)
    }

    pub fn enable(&mut self) -> &mut Self {
        self.enabled = true;
        self
    }

    pub fn disable(&mut self) -> &mut Self {
        self.enabled = false;
        self
    }

    /// Permanently remove the mock from matching.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.enabled = false;
    }

    /// Whether the mock takes part in matching at all.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.destroyed
    }

    /// Check method, URL, query parameters, and body against `request`.
    pub fn matches(&self, request: &Request) -> bool {
        if self.method != request.method {
            return false;
        }
        if !url_matches(&self.url, &request.url) {
            return false;
        }
        if self.params.is_some() && !params_match(self.params.as_ref(), &request.query_params()) {
            return false;
        }
        payload_matches(self.payload.as_ref(), request.payload.as_ref())
    }

    /// Precedence among mocks matching the same request: mocks restricted by
    /// query params or body are consulted before unrestricted ones.
    pub fn specificity(&self) -> u8 {
        u8::from(self.params.is_some()) + u8::from(self.payload.is_some())
    }

    pub(crate) fn record_call(&mut self) -> Responder {
        self.times_called += 1;
        self.responder.clone()
    }
}
