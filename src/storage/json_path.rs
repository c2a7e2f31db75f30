//! JSON path resolution over backend responses.
//!
//! Resolves dot-notation paths like "aggregations.by_evt.buckets" to values.

use serde_json::Value;

/// Resolve a dot-notation path to a value in JSON.
///
/// Numeric segments index into arrays.
///
/// # Examples
/// ```
/// use datalog_core::storage::resolve_json_path;
/// use serde_json::json;
///
/// let data = json!({"hits": {"hits": [{"_id": "a"}]}});
/// assert_eq!(resolve_json_path(&data, "hits.hits.0._id"), Some(&json!("a")));
/// ```
pub fn resolve_json_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(data);
    }

    let mut current = data;
    for part in path.split('.') {
        match current {
            Value::Object(obj) => {
                current = obj.get(part)?;
            }
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                current = arr.get(index)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_path() {
        let data = json!({
            "aggregations": {
                "by_evt": {"buckets": [{"key": "pageview", "doc_count": 3}]}
            }
        });
        assert_eq!(
            resolve_json_path(&data, "aggregations.by_evt.buckets.0.key"),
            Some(&json!("pageview"))
        );
    }

    #[test]
    fn test_missing_path() {
        let data = json!({"hits": {"total": 3}});
        assert_eq!(resolve_json_path(&data, "aggregations"), None);
        assert_eq!(resolve_json_path(&data, "hits.total.value"), None);
        assert_eq!(resolve_json_path(&data, "hits.x.0"), None);
    }

    #[test]
    fn test_empty_path() {
        let data = json!({"hits": {}});
        assert_eq!(resolve_json_path(&data, ""), Some(&data));
    }
}
