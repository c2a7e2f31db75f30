//! Breakdown expression parser.
//!
//! Grammar: `field ("/" field)* (SP "{" json-object "}")?`
//!
//! The trailing object maps numeric report fields to an operation, e.g.
//! `tag/time {"count": "avg"}`. Bare keys and values (`{count:avg}`) are
//! accepted too.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::BreakdownError;

lazy_static! {
    /// Bucket chain, then an optional report object running to the end.
    static ref BREAKDOWN_PATTERN: Regex =
        Regex::new(r"(?s)^\s*(?P<chain>[^{]*?)\s*(?P<report>\{.*\})?\s*$").unwrap();

    static ref FIELD_PATTERN: Regex = Regex::new(r"^[\w.@:-]+$").unwrap();

    /// Unquoted identifiers in key or value position.
    static ref BARE_KEY_PATTERN: Regex =
        Regex::new(r#"([{,]\s*)([A-Za-z_][\w.]*)(\s*:)"#).unwrap();
    static ref BARE_VALUE_PATTERN: Regex =
        Regex::new(r#"(:\s*)([A-Za-z_][\w.]*)(\s*[,}])"#).unwrap();
}

/// A parsed breakdown: the bucket chain plus optional report operations.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownSpec {
    pub bucket_fields: Vec<String>,
    pub report_ops: Option<BTreeMap<String, String>>,
}

impl BreakdownSpec {
    /// The first bucket field, if any.
    pub fn leading_field(&self) -> Option<&str> {
        self.bucket_fields.first().map(|s| s.as_str())
    }
}

/// Parse one breakdown expression.
pub fn parse_breakdown(breakdown: &str) -> Result<BreakdownSpec, BreakdownError> {
    let caps = BREAKDOWN_PATTERN
        .captures(breakdown)
        .ok_or_else(|| BreakdownError::Syntax {
            breakdown: breakdown.to_string(),
        })?;

    let chain = caps.name("chain").map(|m| m.as_str()).unwrap_or_default();
    let bucket_fields = parse_chain(breakdown, chain)?;

    let report_ops = match caps.name("report") {
        Some(m) => Some(parse_report_ops(breakdown, m.as_str())?),
        None => None,
    };

    Ok(BreakdownSpec {
        bucket_fields,
        report_ops,
    })
}

fn parse_chain(breakdown: &str, chain: &str) -> Result<Vec<String>, BreakdownError> {
    if chain.trim().is_empty() {
        return Err(BreakdownError::EmptyChain);
    }
    chain
        .split('/')
        .map(str::trim)
        .map(|field| {
            if FIELD_PATTERN.is_match(field) {
                Ok(field.to_string())
            } else {
                Err(BreakdownError::InvalidField {
                    breakdown: breakdown.to_string(),
                    field: field.to_string(),
                })
            }
        })
        .collect()
}

fn parse_report_ops(
    breakdown: &str,
    json: &str,
) -> Result<BTreeMap<String, String>, BreakdownError> {
    if let Ok(ops) = serde_json::from_str(json) {
        return Ok(ops);
    }
    let quoted = quote_bare_identifiers(json);
    serde_json::from_str(&quoted).map_err(|source| BreakdownError::MalformedReportSpec {
        breakdown: breakdown.to_string(),
        source,
    })
}

/// `{count:avg}` -> `{"count":"avg"}`. Only used when strict parsing fails.
fn quote_bare_identifiers(json: &str) -> String {
    let keys = BARE_KEY_PATTERN.replace_all(json, r#"$1"$2"$3"#);
    BARE_VALUE_PATTERN
        .replace_all(&keys, r#"$1"$2"$3"#)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_single_field() {
        let spec = parse_breakdown("evt").unwrap();
        assert_eq!(spec.bucket_fields, vec!["evt"]);
        assert_eq!(spec.report_ops, None);
        assert_eq!(spec.leading_field(), Some("evt"));
    }

    #[test]
    fn test_chain_trims_whitespace() {
        let spec = parse_breakdown("  evt / time ").unwrap();
        assert_eq!(spec.bucket_fields, vec!["evt", "time"]);
    }

    #[test]
    fn test_report_ops_quoted() {
        let spec = parse_breakdown(r#"tag/time {"count":"avg"}"#).unwrap();
        assert_eq!(spec.bucket_fields, vec!["tag", "time"]);
        assert_eq!(spec.report_ops, ops(&[("count", "avg")]));
    }

    #[test]
    fn test_report_ops_bare() {
        let bare = parse_breakdown("tag/time {count:avg, dt: sum}").unwrap();
        let quoted = parse_breakdown(r#"tag/time {"count":"avg","dt":"sum"}"#).unwrap();
        assert_eq!(bare, quoted);
        assert_eq!(bare.report_ops, ops(&[("count", "avg"), ("dt", "sum")]));
    }

    #[test]
    fn test_quoted_value_with_separators() {
        let spec = parse_breakdown(r#"tag {"count":"a, b:c"}"#).unwrap();
        assert_eq!(spec.bucket_fields, vec!["tag"]);
        assert_eq!(spec.report_ops, ops(&[("count", "a, b:c")]));
    }

    #[test]
    fn test_report_ops_without_space() {
        let spec = parse_breakdown("evt{count:sum}").unwrap();
        assert_eq!(spec.bucket_fields, vec!["evt"]);
        assert_eq!(spec.report_ops, ops(&[("count", "sum")]));
    }

    #[test]
    fn test_malformed_report_ops() {
        let err = parse_breakdown(r#"tag/time {"count": }"#).unwrap_err();
        assert!(matches!(err, BreakdownError::MalformedReportSpec { .. }));

        // not a flat string map
        let err = parse_breakdown(r#"tag {"count": 1}"#).unwrap_err();
        assert!(matches!(err, BreakdownError::MalformedReportSpec { .. }));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let err = parse_breakdown("tag {count:avg} extra").unwrap_err();
        assert!(matches!(err, BreakdownError::Syntax { .. }));
    }

    #[test]
    fn test_empty_segments_rejected() {
        assert!(matches!(
            parse_breakdown("evt//time"),
            Err(BreakdownError::InvalidField { .. })
        ));
        assert!(matches!(
            parse_breakdown("/evt"),
            Err(BreakdownError::InvalidField { .. })
        ));
        assert!(matches!(
            parse_breakdown("{count:avg}"),
            Err(BreakdownError::EmptyChain)
        ));
    }

    #[test]
    fn test_invalid_field_characters() {
        assert!(matches!(
            parse_breakdown("ev t/time"),
            Err(BreakdownError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_dotted_field() {
        let spec = parse_breakdown("props.k/time").unwrap();
        assert_eq!(spec.bucket_fields, vec!["props.k", "time"]);
    }
}
