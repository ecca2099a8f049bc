//! `${...}` JMESPath expressions used by params and body matchers.

use serde_json::Value;

/// Evaluate `expression` against `data` with JMESPath truthiness.
///
/// Expressions that fail to compile or evaluate never match.
pub fn match_with_jmespath(expression: &str, data: &Value) -> bool {
    let Ok(expr) = jmespath::compile(expression) else {
        return false;
    };
    expr.search(data).is_ok_and(|result| result.is_truthy())
}

/// Check whether a string is a `${...}` expression.
pub fn is_expression(s: &str) -> bool {
    s.starts_with("${") && s.ends_with('}') && s.len() > 3
}

/// Strip the `${` `}` wrapper from an expression string.
pub fn strip_expression(s: &str) -> &str {
    s.strip_prefix("${")
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("data.type == 'companies'", true)]
    #[case("data.type == 'users'", false)]
    #[case("data.attributes.name", true)]
    #[case("data.attributes.nickname", false)]
    #[case("data.attributes.employees", true)]
    #[case("length(data.relationships.owners.data) > `0`", false)]
    #[case("data.attributes.\"is-public\"", false)]
    #[case("data.[invalid", false)]
    fn test_match_with_jmespath(#[case] expression: &str, #[case] expected: bool) {
        let body = json!({
            "data": {
                "type": "companies",
                "attributes": {"name": "Acme", "employees": 0, "is-public": false},
                "relationships": {"owners": {"data": []}}
            }
        });
        assert_eq!(match_with_jmespath(expression, &body), expected);
    }

    #[rstest]
    #[case("${page == '1'}", true)]
    #[case("${x}", true)]
    #[case("${}", false)]
    #[case("page == '1'", false)]
    #[case("${unterminated", false)]
    fn test_is_expression(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_expression(input), expected);
    }

    #[rstest]
    #[case("${page == '1'}", "page == '1'")]
    #[case("plain", "plain")]
    fn test_strip_expression(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_expression(input), expected);
    }
}
