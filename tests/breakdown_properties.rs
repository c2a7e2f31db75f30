//! Property tests for event identity and breakdown compilation.

use proptest::prelude::*;

use datalog_core::breakdown::{
    build_aggregation, inject_total_counts, parse_breakdown, AggregationKind, AggregationNode,
    TreeOptions,
};
use datalog_core::event::{compute_hash, make_id, Dataspace, PropValue, Properties};
use datalog_core::logging::LogContext;

/// Field names that are never the reserved `time` token.
///
/// No underscores, so a field can never spell another chain's `by_` name.
fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}".prop_filter("time is reserved", |s| s != "time")
}

fn prop_value() -> impl Strategy<Value = PropValue> {
    prop_oneof![
        (-1e6..1e6f64).prop_map(PropValue::Number),
        "[a-zA-Z0-9 .@]{0,12}".prop_map(PropValue::Text),
    ]
}

fn compile(bd: &str) -> AggregationNode {
    let ctx = LogContext::new("proptest");
    build_aggregation(&parse_breakdown(bd).unwrap(), &TreeOptions::default(), &ctx).unwrap()
}

fn chain(root: &AggregationNode) -> Vec<&AggregationNode> {
    std::iter::successors(Some(root), |n| n.children().first()).collect()
}

proptest! {
    /// Properties given in any order hash their key-sorted `k=v&` text
    #[test]
    fn id_hashes_sorted_pairs_whatever_the_input_order(
        shuffled in prop::collection::btree_map(field_name(), prop_value(), 1..8)
            .prop_map(|m| m.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    ) {
        let ds = Dataspace::new("test").unwrap();
        let props: Properties = shuffled.clone().into_iter().collect();

        let mut sorted = shuffled;
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let txt: String = sorted
            .iter()
            .map(|(k, v)| format!("{}={}&", k, v))
            .collect();

        prop_assert_eq!(
            make_id(&ds, "evt", &props),
            format!("test/evt_{}", compute_hash(&txt))
        );
    }

    /// No properties means the id is the event type
    #[test]
    fn empty_properties_give_event_type(
        ds in "[a-z]{1,10}",
        evt in "[a-z]{1,10}"
    ) {
        let ds = Dataspace::new(&ds).unwrap();
        prop_assert_eq!(make_id(&ds, &evt, &Properties::new()), evt);
    }

    /// a/b compiles to exactly two nodes, named by_a_b then by_b
    #[test]
    fn two_field_chain(a in field_name(), b in field_name()) {
        let root = compile(&format!("{}/{}", a, b));
        let nodes = chain(&root);
        prop_assert_eq!(nodes.len(), 2);
        prop_assert_eq!(nodes[0].name(), format!("by_{}_{}", a, b));
        prop_assert_eq!(nodes[1].name(), format!("by_{}", b));
        prop_assert!(nodes[1].children().is_empty());
    }

    /// `time` always date-buckets, wherever it sits in the chain
    #[test]
    fn time_is_always_date_histogram(
        mut fields in prop::collection::vec(field_name(), 0..4),
        pos in 0usize..4
    ) {
        let pos = pos.min(fields.len());
        fields.insert(pos, "time".to_string());
        let root = compile(&fields.join("/"));

        for (node, field) in chain(&root).into_iter().zip(fields.iter()) {
            if field == "time" {
                let is_histogram = matches!(node.kind(), AggregationKind::DateHistogram { .. });
                prop_assert!(is_histogram);
            } else {
                prop_assert!(node.is_terms());
            }
        }
    }

    /// One total-count node per distinct leading terms field
    #[test]
    fn one_total_per_leading_field(
        leads in prop::collection::vec(field_name(), 1..6),
        tails in prop::collection::vec(field_name(), 6)
    ) {
        let mut roots: Vec<AggregationNode> = leads
            .iter()
            .zip(tails.iter())
            .map(|(lead, tail)| compile(&format!("{}/{}", lead, tail)))
            .collect();
        let before = roots.len();
        let added = inject_total_counts(&mut roots);

        let distinct: std::collections::BTreeSet<&String> = leads.iter().collect();
        prop_assert_eq!(added, distinct.len());
        prop_assert_eq!(roots.len(), before + distinct.len());
    }
}
