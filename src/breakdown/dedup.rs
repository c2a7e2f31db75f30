//! Total-count injection.
//!
//! Breakdowns often share a leading field (`evt/time` and `evt/host` both
//! start with `evt`). Each distinct top-level terms field gets exactly one
//! total-count stats node, keyed on the raw field name. A total whose name
//! is already taken by a root (`by_x` next to `x`) is not added, since the
//! rendered `aggs` object would replace the root.

use std::collections::HashSet;

use crate::event::schema::COUNT_FIELD;

use super::tree::AggregationNode;

/// Append one count-stats root per distinct terms field among `roots`.
///
/// Only roots are scanned; fields nested deeper in a tree are not counted.
/// Returns the number of nodes appended.
pub fn inject_total_counts(roots: &mut Vec<AggregationNode>) -> usize {
    let root_names: HashSet<&str> = roots.iter().map(|r| r.name()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut totals = Vec::new();

    for root in roots.iter().filter(|r| r.is_terms()) {
        let Some(field) = root.target_field() else {
            continue;
        };
        if !seen.insert(field.to_string()) {
            continue;
        }
        if root_names.contains(field) {
            log::warn!(
                "TOTAL_COUNT_SKIPPED reason=name_taken_by_breakdown name={}",
                field
            );
            continue;
        }
        totals.push(AggregationNode::stats(field, COUNT_FIELD));
    }

    let added = totals.len();
    roots.extend(totals);
    added
}
