//! Compact JSON encoding of events for the search backend.
//!
//! Because this has to handle big data, each generic property stores either
//! `n` (numeric) or `v` (text), never both:
//! `{k: string, n?: number, v?: string}`.

use chrono::SecondsFormat;
use serde_json::{json, Map, Value};

use super::model::{Event, PropValue};
use super::schema::{is_common_prop, COMMON_PROPS, COUNT_FIELD, EVENT_TYPE_FIELD, PROPS_FIELD, TIME_FIELD};

impl Event {
    /// Encode as the document indexed by the backend.
    ///
    /// The dataspace is not included; it is given by the index.
    pub fn to_compact_json(&self) -> Value {
        debug_assert!(!self.event_type().trim().is_empty());
        debug_assert!(!self.dataspace().as_str().contains('/'));

        let mut map = Map::new();
        map.insert(EVENT_TYPE_FIELD.to_string(), json!(self.event_type()));
        map.insert(
            TIME_FIELD.to_string(),
            json!(self.time().to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        map.insert(COUNT_FIELD.to_string(), json!(self.count()));

        let props = self.properties();
        if props.is_empty() {
            return Value::Object(map);
        }

        for (name, _) in COMMON_PROPS {
            if let Some(v) = props.get(name) {
                map.insert(name.to_string(), v.to_json());
            }
        }

        let props_list: Vec<Value> = props
            .iter()
            .filter(|(k, _)| !is_common_prop(k))
            .filter_map(|(k, v)| match v {
                PropValue::Number(n) => Some(json!({"k": k, "n": n})),
                PropValue::Text(s) if v.is_truthy() => Some(json!({"k": k, "v": s})),
                PropValue::Text(_) => None,
            })
            .collect();
        map.insert(PROPS_FIELD.to_string(), Value::Array(props_list));

        Value::Object(map)
    }
}
