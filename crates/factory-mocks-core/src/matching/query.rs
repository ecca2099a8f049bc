//! Query parameters parsing and matching (exact, subset, JMESPath).

use crate::expression::match_with_jmespath;
use crate::types::params::ParamsMatcher;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// Parse query string into HashMap with URL decoding.
///
/// `+` decodes to a space as in form encoding. Repeated keys are joined with commas.
pub fn parse_query_string(query_str: &str) -> HashMap<String, String> {
    let mut result: HashMap<String, String> = HashMap::new();

    for pair in query_str.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        let value = decode_component(value);

        result
            .entry(key)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    result
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

/// Values of one parameter, `tags[]=a&tags[]=b` having been joined to `a,b`.
fn value_set(value: &str) -> BTreeSet<&str> {
    value.split(',').map(str::trim).collect()
}

/// JSON document an expression sees: multi-valued parameters become arrays.
fn query_document(query: &HashMap<String, String>) -> Value {
    let map: Map<String, Value> = query
        .iter()
        .map(|(key, value)| {
            let value = if value.contains(',') {
                Value::Array(value_set(value).into_iter().map(Value::from).collect())
            } else {
                Value::from(value.as_str())
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(map)
}

/// Match request query parameters against a mock's params matcher.
///
/// A mock without a matcher accepts any query. `Equals` needs the same keys,
/// `Includes` at least the expected ones; values compare as comma-separated
/// sets, so `b,a` equals `a,b` and includes `a`.
pub fn params_match(expected: Option<&ParamsMatcher>, actual: &HashMap<String, String>) -> bool {
    let (expected, exact) = match expected {
        None => return true,
        Some(ParamsMatcher::Expression(expr)) => {
            return match_with_jmespath(expr, &query_document(actual));
        }
        Some(ParamsMatcher::Equals(map)) => (map, true),
        Some(ParamsMatcher::Includes(map)) => (map, false),
    };

    if exact && expected.len() != actual.len() {
        return false;
    }

    expected.iter().all(|(key, value)| {
        actual.get(key).is_some_and(|found| {
            let wanted = value_set(value);
            let found = value_set(found);
            if exact {
                wanted == found
            } else {
                wanted.is_subset(&found)
            }
        })
    })
}
