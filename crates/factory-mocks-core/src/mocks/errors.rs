//! Error payloads for failing mocks.

use crate::error::MockError;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Error response a failing mock answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorInput {
    /// Sent to the caller unchanged
    Raw(Value),
    /// Attribute name to validation message, converted to JSON:API errors
    FieldMessages(BTreeMap<String, String>),
}

impl ErrorInput {
    /// Build an error input from an untyped response.
    ///
    /// With `convert_errors` unset the response is converted when it is an
    /// object whose `errors` field maps attribute names to string messages,
    /// and passed through otherwise. `Some(false)` always passes through;
    /// `Some(true)` fails when the response does not have that shape.
    pub fn from_response(response: Value, convert_errors: Option<bool>) -> Result<Self, MockError> {
        if convert_errors == Some(false) {
            return Ok(ErrorInput::Raw(response));
        }
        match field_messages(&response) {
            Some(messages) => Ok(ErrorInput::FieldMessages(messages)),
            None if convert_errors == Some(true) => Err(MockError::MalformedErrors),
            None => Ok(ErrorInput::Raw(response)),
        }
    }

    /// Payload delivered with the failed response.
    pub fn into_payload(self) -> Value {
        match self {
            ErrorInput::Raw(value) => value,
            ErrorInput::FieldMessages(messages) => convert_field_errors(&messages),
        }
    }
}

fn field_messages(response: &Value) -> Option<BTreeMap<String, String>> {
    let errors = response.get("errors")?.as_object()?;
    errors
        .iter()
        .map(|(field, message)| Some((field.clone(), message.as_str()?.to_string())))
        .collect()
}

/// Convert `{field: message}` pairs into a JSON:API errors document.
pub fn convert_field_errors(messages: &BTreeMap<String, String>) -> Value {
    let errors: Vec<Value> = messages
        .iter()
        .map(|(field, message)| {
            json!({
                "detail": message,
                "source": { "pointer": format!("data/attributes/{field}") },
                "title": format!("invalid {field}"),
            })
        })
        .collect();

    let mut document = Map::new();
    document.insert("errors".into(), Value::Array(errors));
    Value::Object(document)
}

/// Options for `MockRequest::fails`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureOptions {
    /// Response status, 500 when unset
    pub status: Option<u16>,
    /// Error payload, `null` when unset
    pub response: Option<ErrorInput>,
}

impl FailureOptions {
    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            response: None,
        }
    }

    pub fn with_response(mut self, response: ErrorInput) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_field_errors<I, K, V>(self, errors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let messages = errors
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with_response(ErrorInput::FieldMessages(messages))
    }
}
