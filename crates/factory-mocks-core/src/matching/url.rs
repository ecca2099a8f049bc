//! URL pattern matching with `{name}` placeholder segments.

use regex::Regex;

/// Match a request URL against a mock URL pattern.
///
/// Query strings on either side are ignored and trailing slashes are not
/// significant. A `{name}` segment matches any single path segment.
pub fn url_matches(pattern: &str, url: &str) -> bool {
    let pattern = normalize_url(pattern);
    let url = normalize_url(url);

    if !pattern.contains('{') {
        return pattern == url;
    }

    pattern_to_regex(&pattern).is_some_and(|regex| regex.is_match(&url))
}

fn normalize_url(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or("");
    let trimmed = without_query.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".into()
    } else {
        trimmed.into()
    }
}

fn pattern_to_regex(pattern: &str) -> Option<Regex> {
    let mut regex_str = String::from("^");
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c == '{' {
            chars.by_ref().take_while(|&c| c != '}').for_each(drop);
            regex_str.push_str("[^/]+");
        } else {
            regex_str.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        }
    }
    regex_str.push('$');

    Regex::new(&regex_str).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/companies", "/api/companies", true)]
    #[case("/api/companies", "/api/companies/", true)]
    #[case("/api/companies", "/api/companies?page=2", true)]
    #[case("/api/companies?ignored=1", "/api/companies", true)]
    #[case("/api/companies/{id}", "/api/companies/1", true)]
    #[case("/api/companies/{id}", "/api/companies/abc-123", true)]
    #[case("/api/companies/{id}/owners/{owner}", "/api/companies/1/owners/2", true)]
    #[case("/api/companies", "/api/company", false)]
    #[case("/api/companies/{id}", "/api/companies", false)]
    #[case("/api/companies/{id}", "/api/companies/1/owners", false)]
    #[case("/", "/", true)]
    #[case("/api/companies.json", "/api/companies.json", true)]
    #[case("/api/{kind}.json", "/api/companiesXjson", false)]
    #[case("http://localhost/api/companies", "http://localhost/api/companies", true)]
    fn test_url_matches(#[case] pattern: &str, #[case] url: &str, #[case] expected: bool) {
        assert_eq!(url_matches(pattern, url), expected);
    }
}
