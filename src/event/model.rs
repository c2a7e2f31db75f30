//! Events and their identity.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::EventError;

use super::dataspace::Dataspace;

/// A property value: numeric or text, nothing else.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Number(f64),
    Text(String),
}

impl PropValue {
    pub fn is_numeric(&self) -> bool {
        matches!(self, PropValue::Number(_))
    }

    /// Whether a text value carries information: empty and "false" do not.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Number(_) => true,
            PropValue::Text(s) => !s.is_empty() && s != "false",
        }
    }

    /// Convert a JSON value. Nulls have no representation.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(PropValue::Number),
            Value::String(s) => Some(PropValue::Text(s.clone())),
            Value::Bool(b) => Some(PropValue::Text(b.to_string())),
            other => Some(PropValue::Text(other.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PropValue::Number(n) => Value::from(*n),
            PropValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Number(n as f64)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

/// Event properties, kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(BTreeMap<String, PropValue>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object, dropping null values.
    pub fn from_json_object(obj: &Map<String, Value>) -> Self {
        obj.iter()
            .filter_map(|(k, v)| PropValue::from_json(v).map(|pv| (k.clone(), pv)))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One logged measurement.
///
/// Everything except `time` is fixed at construction. The id covers the
/// dataspace, event type and properties, never the time or count, so
/// repeated observations of the same thing upsert onto one document.
#[derive(Debug, Clone)]
pub struct Event {
    dataspace: Dataspace,
    event_type: String,
    count: f64,
    properties: Properties,
    id: String,
    time: DateTime<Utc>,
}

impl Event {
    pub fn new(
        dataspace: &str,
        count: f64,
        event_type: &str,
        properties: Properties,
    ) -> Result<Self, EventError> {
        let dataspace = Dataspace::new(dataspace)?;
        if event_type.trim().is_empty() {
            return Err(EventError::BlankEventType);
        }
        if !count.is_finite() {
            return Err(EventError::NonFiniteCount { count });
        }
        for (key, value) in properties.iter() {
            if let PropValue::Number(n) = value {
                if !n.is_finite() {
                    return Err(EventError::NonFiniteProperty {
                        key: key.clone(),
                        value: *n,
                    });
                }
            }
        }
        let id = make_id(&dataspace, event_type, &properties);
        Ok(Self {
            dataspace,
            event_type: event_type.to_string(),
            count,
            properties,
            id,
            time: Utc::now(),
        })
    }

    /// A single occurrence with no properties.
    pub fn simple(dataspace: &str, event_type: &str) -> Result<Self, EventError> {
        Self::new(dataspace, 1.0, event_type, Properties::new())
    }

    pub fn dataspace(&self) -> &Dataspace {
        &self.dataspace
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn count(&self) -> f64 {
        self.count
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Set by the ingestion layer; may be a bucket start rather than the
    /// exact instant.
    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.time = time;
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event[id={} dataspace={} type={} count={} props={}]",
            self.id,
            self.dataspace,
            self.event_type,
            self.count,
            self.properties.len()
        )
    }
}

/// Derive the event id.
///
/// Empty properties give the bare event type. Otherwise the sorted
/// `key=value&` pairs are hashed and the id is `dataspace/eventType_<hash>`.
pub fn make_id(dataspace: &Dataspace, event_type: &str, properties: &Properties) -> String {
    if properties.is_empty() {
        return event_type.to_string();
    }
    let mut txt = String::new();
    for (key, value) in properties.iter() {
        txt.push_str(key);
        txt.push('=');
        txt.push_str(&value.to_string());
        txt.push('&');
    }
    format!("{}/{}_{}", dataspace, event_type, compute_hash(&txt))
}

/// Compute SHA256 hash of content.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
