//! Search results as handed to the rendering layer.
//!
//! The aggregation tree and the example documents are passed through as-is;
//! nothing here interprets buckets or stats.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::json_path::resolve_json_path;

/// Key under which example documents are added to the payload.
pub const EXAMPLES_KEY: &str = "examples";

/// Raw aggregation results plus a slice of matching documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub aggregations: Map<String, Value>,
    pub examples: Vec<Value>,
}

impl SearchResults {
    /// Split a raw backend response. Missing sections come back empty.
    pub fn from_response(response: &Value) -> Self {
        let aggregations = resolve_json_path(response, "aggregations")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let examples = resolve_json_path(response, "hits.hits")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Self {
            aggregations,
            examples,
        }
    }

    /// The aggregation tree with the examples added under `examples`.
    pub fn into_payload(self) -> Value {
        let mut payload = self.aggregations;
        payload.insert(EXAMPLES_KEY.to_string(), Value::Array(self.examples));
        Value::Object(payload)
    }
}
