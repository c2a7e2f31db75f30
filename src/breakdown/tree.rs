//! Aggregation tree builder.
//!
//! Compiles a `BreakdownSpec` into a linear chain of bucket nodes. `evt/time`
//! becomes terms(evt) -> date_histogram(time). Report ops hang zero-filtered
//! stats off the leaf bucket.

use serde_json::{json, Map, Value};

use crate::error::BreakdownError;
use crate::event::schema::{field_type, TIME_FIELD};
use crate::logging::structured::LogContext;
use crate::storage::filter::FilterClause;

use super::interval::Interval;
use super::parser::BreakdownSpec;

/// The backend's designated placeholder for documents missing a terms field.
pub const MISSING_TOKEN: &str = "unset";

/// Operation names accepted in report specs.
pub const REPORT_OPERATIONS: &[&str] = &["avg", "sum", "min", "max", "count", "stats"];

/// What a node computes.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationKind {
    /// Bucket by term value.
    Terms {
        field: String,
        size: Option<usize>,
        missing: String,
    },
    /// Bucket by time interval. No size limit.
    DateHistogram { field: String, interval: Interval },
    /// Numeric summary (count/min/max/avg/sum).
    Stats { field: String },
    /// Restrict child aggregations to documents matching a filter.
    Filtered { filter: FilterClause },
}

/// One grouping or statistic operation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationNode {
    name: String,
    kind: AggregationKind,
    target_field: Option<String>,
    children: Vec<AggregationNode>,
}

impl AggregationNode {
    fn terms(name: String, field: &str, size: Option<usize>) -> Self {
        Self {
            name,
            kind: AggregationKind::Terms {
                field: field.to_string(),
                size,
                missing: MISSING_TOKEN.to_string(),
            },
            target_field: Some(field.to_string()),
            children: Vec::new(),
        }
    }

    fn date_histogram(name: String, interval: Interval) -> Self {
        Self {
            name,
            kind: AggregationKind::DateHistogram {
                field: TIME_FIELD.to_string(),
                interval,
            },
            target_field: Some(TIME_FIELD.to_string()),
            children: Vec::new(),
        }
    }

    pub(crate) fn stats(name: &str, field: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: AggregationKind::Stats {
                field: field.to_string(),
            },
            target_field: Some(field.to_string()),
            children: Vec::new(),
        }
    }

    /// Stats on `field` computed only where `field > 0`.
    fn non_zero_stats(field: &str) -> Self {
        Self {
            name: format!("no0_{}", field),
            kind: AggregationKind::Filtered {
                filter: FilterClause::greater_than(field, json!(0)),
            },
            target_field: Some(field.to_string()),
            children: vec![Self::stats(field, field)],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AggregationKind {
        &self.kind
    }

    pub fn target_field(&self) -> Option<&str> {
        self.target_field.as_deref()
    }

    pub fn children(&self) -> &[AggregationNode] {
        &self.children
    }

    pub fn is_terms(&self) -> bool {
        matches!(self.kind, AggregationKind::Terms { .. })
    }

    /// Render as the backend's `{type: {...}, aggs: {...}}` body.
    pub fn body_json(&self) -> Value {
        let mut body = Map::new();
        match &self.kind {
            AggregationKind::Terms {
                field,
                size,
                missing,
            } => {
                let mut terms = json!({"field": field, "missing": missing});
                if let Some(size) = size {
                    terms["size"] = json!(size);
                }
                body.insert("terms".to_string(), terms);
            }
            AggregationKind::DateHistogram { field, interval } => {
                body.insert(
                    "date_histogram".to_string(),
                    json!({"field": field, "fixed_interval": interval.to_fixed_interval()}),
                );
            }
            AggregationKind::Stats { field } => {
                body.insert("stats".to_string(), json!({"field": field}));
            }
            AggregationKind::Filtered { filter } => {
                body.insert("filter".to_string(), filter.to_json());
            }
        }
        if !self.children.is_empty() {
            body.insert("aggs".to_string(), aggregations_json(&self.children));
        }
        Value::Object(body)
    }
}

/// Render sibling nodes as a name-keyed `aggs` object.
pub fn aggregations_json(nodes: &[AggregationNode]) -> Value {
    let map: Map<String, Value> = nodes
        .iter()
        .map(|node| (node.name.clone(), node.body_json()))
        .collect();
    Value::Object(map)
}

/// Per-request settings for tree building.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeOptions {
    pub interval: Interval,
    /// Max buckets per terms node. `None` or 0 leaves the backend default.
    pub result_ceiling: Option<usize>,
}

/// Compile one breakdown into a rooted aggregation tree.
pub fn build_aggregation(
    spec: &BreakdownSpec,
    options: &TreeOptions,
    ctx: &LogContext,
) -> Result<AggregationNode, BreakdownError> {
    let fields = &spec.bucket_fields;
    if fields.is_empty() {
        return Err(BreakdownError::EmptyChain);
    }
    let size = options.result_ceiling.filter(|n| *n > 0);

    // One node per field, named by the remaining suffix of the chain
    let mut chain: Vec<AggregationNode> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let name = format!("by_{}", fields[i..].join("_"));
            if field == TIME_FIELD {
                AggregationNode::date_histogram(name, options.interval)
            } else {
                AggregationNode::terms(name, field, size)
            }
        })
        .collect();

    if let Some(report_ops) = &spec.report_ops {
        if let Some(leaf) = chain.last_mut() {
            for (field, op) in report_ops {
                if !field_type(field).map_or(false, |t| t.is_numeric()) {
                    crate::log_warn!(
                        ctx,
                        "REPORT_FIELD_NOT_NUMERIC",
                        field = field,
                        op = op,
                        breakdown = fields.join("/"),
                    );
                }
                if !REPORT_OPERATIONS.contains(&op.as_str()) {
                    crate::log_warn!(
                        ctx,
                        "REPORT_OP_UNKNOWN",
                        field = field,
                        op = op,
                        known = REPORT_OPERATIONS,
                    );
                }
                leaf.children.push(AggregationNode::non_zero_stats(field));
            }
        }
    }

    // Fold leaf-first so each node becomes the sole child of its parent
    let mut node = chain.pop().ok_or(BreakdownError::EmptyChain)?;
    while let Some(mut parent) = chain.pop() {
        parent.children.push(node);
        node = parent;
    }

    log::debug!(
        "{} AGGREGATION_BUILT name={} depth={}",
        ctx,
        node.name,
        fields.len()
    );

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::parser::parse_breakdown;

    fn build(bd: &str, options: &TreeOptions) -> AggregationNode {
        let ctx = LogContext::new("test");
        build_aggregation(&parse_breakdown(bd).unwrap(), options, &ctx).unwrap()
    }

    #[test]
    fn test_flat_facet() {
        let root = build("publisher", &TreeOptions::default());
        assert_eq!(root.name(), "by_publisher");
        assert_eq!(root.target_field(), Some("publisher"));
        assert!(root.is_terms());
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_two_level_chain_names() {
        let root = build("evt/host", &TreeOptions::default());
        assert_eq!(root.name(), "by_evt_host");
        assert_eq!(root.children().len(), 1);

        let child = &root.children()[0];
        assert_eq!(child.name(), "by_host");
        assert_eq!(child.target_field(), Some("host"));
        assert!(child.children().is_empty());
    }

    #[test]
    fn test_three_level_chain_names() {
        let root = build("evt/host/time", &TreeOptions::default());
        let names: Vec<&str> = std::iter::successors(Some(&root), |n| n.children().first())
            .map(|n| n.name())
            .collect();
        assert_eq!(names, vec!["by_evt_host_time", "by_host_time", "by_time"]);
    }

    #[test]
    fn test_time_is_date_histogram_anywhere() {
        let options = TreeOptions {
            interval: Interval::HOUR,
            result_ceiling: Some(5),
        };
        let root = build("time/evt", &options);
        assert_eq!(
            root.kind(),
            &AggregationKind::DateHistogram {
                field: "time".to_string(),
                interval: Interval::HOUR
            }
        );
        assert!(!root.is_terms());
        assert!(root.children()[0].is_terms());
    }

    #[test]
    fn test_terms_size_and_missing() {
        let with_ceiling = build(
            "evt",
            &TreeOptions {
                result_ceiling: Some(10),
                ..Default::default()
            },
        );
        assert_eq!(
            with_ceiling.kind(),
            &AggregationKind::Terms {
                field: "evt".to_string(),
                size: Some(10),
                missing: "unset".to_string()
            }
        );

        let zero_ceiling = build(
            "evt",
            &TreeOptions {
                result_ceiling: Some(0),
                ..Default::default()
            },
        );
        assert!(matches!(
            zero_ceiling.kind(),
            AggregationKind::Terms { size: None, .. }
        ));
    }

    #[test]
    fn test_report_ops_attach_to_leaf() {
        let root = build("tag/time {count:avg}", &TreeOptions::default());
        assert_eq!(root.children().len(), 1);

        let leaf = &root.children()[0];
        assert_eq!(leaf.name(), "by_time");
        assert_eq!(leaf.children().len(), 1);

        let filtered = &leaf.children()[0];
        assert_eq!(filtered.name(), "no0_count");
        assert_eq!(filtered.target_field(), Some("count"));
        assert_eq!(
            filtered.kind(),
            &AggregationKind::Filtered {
                filter: FilterClause::greater_than("count", json!(0))
            }
        );
        assert_eq!(filtered.children(), &[AggregationNode::stats("count", "count")]);
    }

    #[test]
    fn test_non_numeric_report_field_still_built() {
        let root = build("evt {tag:avg}", &TreeOptions::default());
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].name(), "no0_tag");
    }

    #[test]
    fn test_empty_chain_rejected() {
        let spec = BreakdownSpec {
            bucket_fields: vec![],
            report_ops: None,
        };
        let ctx = LogContext::new("test");
        assert!(matches!(
            build_aggregation(&spec, &TreeOptions::default(), &ctx),
            Err(BreakdownError::EmptyChain)
        ));
    }

    #[test]
    fn test_body_json() {
        let root = build(
            "evt/time {count:avg}",
            &TreeOptions {
                interval: Interval::HOUR,
                result_ceiling: Some(10),
            },
        );
        assert_eq!(
            aggregations_json(&[root]),
            json!({
                "by_evt_time": {
                    "terms": {"field": "evt", "missing": "unset", "size": 10},
                    "aggs": {
                        "by_time": {
                            "date_histogram": {"field": "time", "fixed_interval": "1h"},
                            "aggs": {
                                "no0_count": {
                                    "filter": {"range": {"count": {"gt": 0}}},
                                    "aggs": {
                                        "count": {"stats": {"field": "count"}}
                                    }
                                }
                            }
                        }
                    }
                }
            })
        );
    }
}
