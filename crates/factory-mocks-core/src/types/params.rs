//! Query parameter matchers for mocks.

use crate::expression::{is_expression, strip_expression};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// How a mock restricts the query parameters of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsMatcher {
    /// Request query must carry exactly these parameters
    Equals(HashMap<String, String>),
    /// Request query must contain at least these parameters
    Includes(HashMap<String, String>),
    /// JMESPath expression evaluated against the request query
    Expression(String),
}

impl ParamsMatcher {
    /// Exact matcher from JSON query params, e.g. `{"id": 1, "filter": {"name": "x"}}`.
    pub fn equals(params: &Value) -> Self {
        ParamsMatcher::Equals(flatten_params(params))
    }

    /// Subset matcher from JSON query params.
    pub fn includes(params: &Value) -> Self {
        ParamsMatcher::Includes(flatten_params(params))
    }
}

impl Serialize for ParamsMatcher {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ParamsMatcher::Equals(map) | ParamsMatcher::Includes(map) => map.serialize(serializer),
            ParamsMatcher::Expression(expr) => format!("${{{}}}", expr).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ParamsMatcher {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::String(s) if is_expression(s) => {
                Ok(ParamsMatcher::Expression(strip_expression(s).to_string()))
            }
            Value::Object(_) => Ok(ParamsMatcher::includes(&value)),
            _ => Err(serde::de::Error::custom(
                "Params must be either an object or an expression string",
            )),
        }
    }
}

/// Flatten JSON query params into the string map a serialized query string decodes to.
///
/// Nested objects use bracket keys (`filter[name]`), arrays use `key[]` with
/// comma-joined values, matching how repeated keys are parsed.
pub fn flatten_params(params: &Value) -> HashMap<String, String> {
    let mut result = HashMap::new();
    if let Value::Object(map) = params {
        for (key, value) in map {
            flatten_into(key, value, &mut result);
        }
    }
    result
}

fn flatten_into(key: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (child, value) in map {
                flatten_into(&format!("{key}[{child}]"), value, out);
            }
        }
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(format!("{key}[]"), joined);
        }
        _ => {
            out.insert(key.to_string(), scalar_to_string(value));
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn h(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[rstest]
    #[case(json!({}), &[])]
    #[case(json!({"id": 1}), &[("id", "1")])]
    #[case(json!({"name": "Dude", "active": true}), &[("name", "Dude"), ("active", "true")])]
    #[case(json!({"filter": {"name": "x"}}), &[("filter[name]", "x")])]
    #[case(json!({"tags": ["a", "b"]}), &[("tags[]", "a,b")])]
    #[case(json!({"deleted": null}), &[("deleted", "")])]
    #[case(json!("not-an-object"), &[])]
    fn test_flatten_params(#[case] params: Value, #[case] expected: &[(&str, &str)]) {
        assert_eq!(flatten_params(&params), h(expected));
    }

    #[rstest]
    fn test_deserialize_object_as_includes() {
        let matcher: ParamsMatcher =
            serde_json::from_value(json!({"page": 1})).expect("Should deserialize");
        assert_eq!(matcher, ParamsMatcher::Includes(h(&[("page", "1")])));
    }

    #[rstest]
    fn test_deserialize_expression() {
        let matcher: ParamsMatcher =
            serde_json::from_value(json!("${page == '1'}")).expect("Should deserialize");
        assert_eq!(matcher, ParamsMatcher::Expression("page == '1'".to_string()));
    }

    #[rstest]
    #[case(json!(1))]
    #[case(json!("plain string"))]
    #[case(json!([1, 2]))]
    fn test_deserialize_invalid(#[case] value: Value) {
        assert!(serde_json::from_value::<ParamsMatcher>(value).is_err());
    }

    #[rstest]
    fn test_expression_serializes_wrapped() {
        let matcher = ParamsMatcher::Expression("page == '1'".to_string());
        let json = serde_json::to_value(&matcher).expect("Should serialize");
        assert_eq!(json, json!("${page == '1'}"));
    }
}
