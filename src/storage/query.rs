//! Free-text search queries.
//!
//! `host:example.com "some words" campaign:"spring sale"` splits into
//! key/value properties and free terms. Only properties are ever turned into
//! filters, and only for an allow-list of names.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `key:"quoted"`, `key:value`, `"quoted"` or a bare word.
    static ref TOKEN_PATTERN: Regex = Regex::new(
        r#"(?:(?P<key>\w+):(?:"(?P<qval>[^"]*)"|(?P<val>\S+)))|"(?P<phrase>[^"]*)"|(?P<word>\S+)"#
    ).unwrap();
}

/// A parsed free-text query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    raw: String,
    props: Vec<(String, String)>,
    terms: Vec<String>,
}

impl SearchQuery {
    pub fn parse(q: &str) -> Self {
        let mut props: Vec<(String, String)> = Vec::new();
        let mut terms = Vec::new();

        for caps in TOKEN_PATTERN.captures_iter(q) {
            if let Some(key) = caps.name("key") {
                let value = caps
                    .name("qval")
                    .or_else(|| caps.name("val"))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                // first occurrence wins
                if !props.iter().any(|(k, _)| k == key.as_str()) {
                    props.push((key.as_str().to_string(), value));
                }
            } else if let Some(m) = caps.name("phrase").or_else(|| caps.name("word")) {
                if !m.as_str().is_empty() {
                    terms.push(m.as_str().to_string());
                }
            }
        }

        Self {
            raw: q.to_string(),
            props,
            terms,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.terms.is_empty()
    }

    /// Value of a `key:value` property.
    pub fn prop(&self, key: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn props(&self) -> &[(String, String)] {
        &self.props
    }

    /// Words and quoted phrases that are not properties.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
