//! Filter clauses for search requests.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::event::schema::TIME_FIELD;

/// A single non-scoring filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Bounded range on a field. Unset bounds are open.
    Range {
        field: String,
        gt: Option<Value>,
        gte: Option<Value>,
        lt: Option<Value>,
    },
    /// Exact match on a keyword field.
    Term { field: String, value: String },
}

impl FilterClause {
    pub fn greater_than(field: &str, value: Value) -> Self {
        FilterClause::Range {
            field: field.to_string(),
            gt: Some(value),
            gte: None,
            lt: None,
        }
    }

    /// `[start, end)` on the event time field. Fractional seconds are kept
    /// when present so a sub-second window never collapses to empty.
    pub fn time_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        FilterClause::Range {
            field: TIME_FIELD.to_string(),
            gt: None,
            gte: Some(json!(start.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
            lt: Some(json!(end.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
        }
    }

    pub fn term(field: &str, value: &str) -> Self {
        FilterClause::Term {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            FilterClause::Range { field, .. } | FilterClause::Term { field, .. } => field,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FilterClause::Range { field, gt, gte, lt } => {
                let mut bounds = Map::new();
                for (op, bound) in [("gt", gt), ("gte", gte), ("lt", lt)] {
                    if let Some(v) = bound {
                        bounds.insert(op.to_string(), v.clone());
                    }
                }
                json!({"range": {field.as_str(): bounds}})
            }
            FilterClause::Term { field, value } => json!({"term": {field.as_str(): value}}),
        }
    }
}

/// Conjunction of filter clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolFilter {
    clauses: Vec<FilterClause>,
}

impl BoolFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn to_json(&self) -> Value {
        let clauses: Vec<Value> = self.clauses.iter().map(FilterClause::to_json).collect();
        json!({"bool": {"filter": clauses}})
    }
}
