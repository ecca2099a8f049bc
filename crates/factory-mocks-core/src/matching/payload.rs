//! Request body matching by containment or JMESPath expression.

use crate::expression::{is_expression, match_with_jmespath, strip_expression};
use serde_json::Value;

/// Match a request body against a mock's expected payload.
///
/// A `${...}` string is evaluated as a JMESPath expression; any other value must
/// be contained in the request body. A mock without an expected payload (or with
/// `null` / `{}`) accepts any body, including none.
pub fn payload_matches(expected: Option<&Value>, actual: Option<&Value>) -> bool {
    match expected {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) if map.is_empty() => true,
        Some(Value::String(s)) if is_expression(s) => {
            actual.is_some_and(|body| match_with_jmespath(strip_expression(s), body))
        }
        Some(expected) => actual.is_some_and(|body| contains(body, expected)),
    }
}

/// Objects match when every expected key matches; arrays when every expected
/// element matches some element of the body.
fn contains(body: &Value, expected: &Value) -> bool {
    match (body, expected) {
        (Value::Object(body), Value::Object(expected)) => expected
            .iter()
            .all(|(key, value)| body.get(key).is_some_and(|found| contains(found, value))),
        (Value::Array(body), Value::Array(expected)) => expected
            .iter()
            .all(|value| body.iter().any(|found| contains(found, value))),
        _ => body == expected,
    }
}
