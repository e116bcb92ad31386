//! Builds the per-request lookup table from form body, query string and
//! cookies.
//!
//! Parsing is tolerant: a fragment without a usable `=value` maps its key to
//! no value instead of failing. Query values are used as they appear on the
//! wire, while the body is percent-decoded as a whole before it is split.

use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, Option<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `k=v&k2=v2` without decoding.
    pub fn from_query(query: Option<&str>) -> Self {
        query.map(parse_pairs).unwrap_or_default()
    }

    /// Parses a form-encoded body after percent-decoding all of it.
    pub fn from_body(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        let raw = String::from_utf8_lossy(body).replace('+', " ");
        let decoded = urlencoding::decode_binary(raw.as_bytes());
        parse_pairs(&String::from_utf8_lossy(&decoded))
    }

    /// Parses a `Cookie` header. A cookie without a value maps to `""`.
    pub fn from_cookies(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::default();
        };
        let values = header
            .split(';')
            .map(str::trim_start)
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| {
                let parts = split_parts(fragment);
                let key = parts.first().copied().unwrap_or_default().to_string();
                let value = parts.get(1).copied().unwrap_or_default().to_string();
                (key, Some(value))
            })
            .collect();
        Params { values }
    }

    /// Overlays body, then query, then cookies; later sources win.
    pub fn merge(body: Params, query: Params, cookies: Params) -> Self {
        let mut merged = body;
        merged.overlay(query);
        merged.overlay(cookies);
        merged
    }

    pub fn overlay(&mut self, other: Params) {
        self.values.extend(other.values);
    }

    /// Value for `key`; `None` when the key is absent or has no value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.values.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

fn parse_pairs(raw: &str) -> Params {
    let values = raw
        .split('&')
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            let parts = split_parts(fragment);
            let key = parts.first().copied().unwrap_or_default().to_string();
            let value = match parts[..] {
                [_, value] => Some(value.to_string()),
                _ => None,
            };
            (key, value)
        })
        .collect();
    Params { values }
}

/// Splits on `=`, dropping trailing empty parts so `k=` yields just `[k]`.
fn split_parts(fragment: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = fragment.split('=').collect();
    while parts.len() > 1 && parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("id=7", "id", Some("7"))]
    #[case("id", "id", None)]
    #[case("id=", "id", None)]
    #[case("id=a=b", "id", None)]
    #[case("id=a%20b", "id", Some("a%20b"))]
    fn query_fragments(#[case] query: &str, #[case] key: &str, #[case] expected: Option<&str>) {
        let params = Params::from_query(Some(query));

        assert!(params.contains_key(key));
        assert_eq!(params.get(key), expected);
    }

    #[test]
    fn absent_query_is_empty() {
        assert!(Params::from_query(None).is_empty());
    }

    #[test]
    fn query_with_several_pairs() {
        let params = Params::from_query(Some("a=1&b=2&&c"));

        assert_eq!(params.len(), 3);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("2"));
        assert_eq!(params.get("c"), None);
    }

    #[test]
    fn body_is_percent_decoded() {
        let params = Params::from_body(b"name=John+Doe&city=S%C3%A3o%20Paulo");

        assert_eq!(params.get("name"), Some("John Doe"));
        assert_eq!(params.get("city"), Some("São Paulo"));
    }

    #[test]
    fn body_is_decoded_before_splitting() {
        let params = Params::from_body(b"q=a%26b%3Dc");

        assert_eq!(params.get("q"), Some("a"));
        assert_eq!(params.get("b"), Some("c"));
    }

    #[test]
    fn empty_body_is_empty() {
        assert!(Params::from_body(b"").is_empty());
    }

    #[test]
    fn cookies_split_on_semicolons() {
        let params = Params::from_cookies(Some("session=abc; theme=dark; flag"));

        assert_eq!(params.get("session"), Some("abc"));
        assert_eq!(params.get("theme"), Some("dark"));
        assert_eq!(params.get("flag"), Some(""));
    }

    #[test]
    fn later_sources_win() {
        let body = Params::from_body(b"id=body&only_body=1");
        let query = Params::from_query(Some("id=query&only_query=2"));
        let cookies = Params::from_cookies(Some("id=cookie"));

        let merged = Params::merge(body, query, cookies);

        assert_eq!(merged.get("id"), Some("cookie"));
        assert_eq!(merged.get("only_body"), Some("1"));
        assert_eq!(merged.get("only_query"), Some("2"));
    }

    #[test]
    fn query_overrides_body() {
        let merged = Params::merge(
            Params::from_body(b"id=1"),
            Params::from_query(Some("id=2")),
            Params::new(),
        );

        assert_eq!(merged.get("id"), Some("2"));
    }

    #[test]
    fn valueless_query_key_shadows_body_value() {
        let merged = Params::merge(
            Params::from_body(b"id=1"),
            Params::from_query(Some("id")),
            Params::new(),
        );

        assert!(merged.contains_key("id"));
        assert_eq!(merged.get("id"), None);
    }
}
