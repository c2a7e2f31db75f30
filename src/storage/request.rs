//! Search request assembly.
//!
//! A `RequestDraft` collects the request settings and is consumed by
//! `prepare_search`, which yields an immutable `CompiledRequest`. A draft
//! cannot be touched after it has been finalised:
//!
//! ```compile_fail
//! use datalog_core::event::Dataspace;
//! use datalog_core::storage::RequestDraft;
//!
//! let draft = RequestDraft::new(Dataspace::new("default").unwrap());
//! let compiled = draft.prepare_search().unwrap();
//! let draft = draft.result_ceiling(5); // use of moved value
//! ```

use chrono::{DateTime, Months, Utc};
use serde_json::{json, Value};

use crate::breakdown::dedup::inject_total_counts;
use crate::breakdown::interval::Interval;
use crate::breakdown::parser::parse_breakdown;
use crate::breakdown::tree::{aggregations_json, build_aggregation, AggregationNode, TreeOptions};
use crate::error::{RequestError, Result};
use crate::event::dataspace::{Dataspace, INDEX_PREFIX};
use crate::logging::structured::LogContext;

use super::filter::{BoolFilter, FilterClause};
use super::query::SearchQuery;

/// Query properties honoured as exact-match filters by default.
pub const DEFAULT_FILTERABLE_PROPS: &[&str] = &["host", "campaign"];

/// Example documents returned alongside the aggregations by default.
pub const DEFAULT_EXAMPLE_CEILING: usize = 10;

/// Default window: the month up to `end`.
pub fn default_time_window(end: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = end
        .checked_sub_months(Months::new(1))
        .unwrap_or(end - chrono::Duration::days(30));
    (start, end)
}

/// Mutable, single-use request settings.
#[derive(Debug, Clone)]
pub struct RequestDraft {
    dataspace: Dataspace,
    index_prefix: String,
    result_ceiling: Option<usize>,
    example_ceiling: usize,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    query: SearchQuery,
    breakdowns: Vec<Option<String>>,
    interval: Interval,
    filterable_props: Vec<String>,
    log_ctx: LogContext,
}

impl RequestDraft {
    pub fn new(dataspace: Dataspace) -> Self {
        let log_ctx = LogContext::new(dataspace.as_str());
        Self {
            dataspace,
            index_prefix: INDEX_PREFIX.to_string(),
            result_ceiling: None,
            example_ceiling: DEFAULT_EXAMPLE_CEILING,
            window: None,
            query: SearchQuery::default(),
            breakdowns: Vec::new(),
            interval: Interval::default(),
            filterable_props: DEFAULT_FILTERABLE_PROPS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_ctx,
        }
    }

    /// Max buckets per terms node. 0 means the backend default.
    pub fn result_ceiling(mut self, n: usize) -> Self {
        self.result_ceiling = Some(n);
        self
    }

    /// Max example documents returned.
    pub fn example_ceiling(mut self, n: usize) -> Self {
        self.example_ceiling = n;
        self
    }

    /// `[start, end)`. Defaults to the month up to now.
    pub fn time_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.window = Some((start, end));
        self
    }

    pub fn query(mut self, query: SearchQuery) -> Self {
        self.query = query;
        self
    }

    /// Breakdown expressions in order. `None` and blank entries are skipped.
    pub fn breakdowns<I, S>(mut self, breakdowns: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.breakdowns = breakdowns.into_iter().map(|b| b.map(Into::into)).collect();
        self
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn filterable_props(mut self, props: Vec<String>) -> Self {
        self.filterable_props = props;
        self
    }

    pub fn index_prefix(mut self, prefix: &str) -> Self {
        self.index_prefix = prefix.to_string();
        self
    }

    pub fn log_context(mut self, ctx: LogContext) -> Self {
        self.log_ctx = ctx;
        self
    }

    /// Finalise: resolve the index, build the filter and every aggregation.
    pub fn prepare_search(self) -> Result<CompiledRequest> {
        let ctx = self.log_ctx;
        let index = self.dataspace.index_name_with_prefix(&self.index_prefix);

        let (start, end) = self
            .window
            .unwrap_or_else(|| default_time_window(Utc::now()));
        if start >= end {
            return Err(RequestError::InvalidTimeRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        let filter = build_filter(&self.query, start, end, &self.filterable_props, &ctx);

        let options = TreeOptions {
            interval: self.interval,
            result_ceiling: self.result_ceiling,
        };
        let mut aggregations = build_aggregations(&self.breakdowns, &options, &ctx)?;
        let totals = inject_total_counts(&mut aggregations);

        log::info!(
            "{} SEARCH_PREPARED index={} filters={} aggregations={} totals={}",
            ctx,
            index,
            filter.clauses().len(),
            aggregations.len(),
            totals
        );

        Ok(CompiledRequest {
            index,
            filter,
            aggregations,
            size: self.example_ceiling,
        })
    }
}

/// Time window plus allow-listed `key:value` props from the query.
fn build_filter(
    query: &SearchQuery,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    filterable_props: &[String],
    ctx: &LogContext,
) -> BoolFilter {
    let mut filter = BoolFilter::new().must(FilterClause::time_window(start, end));

    for prop in filterable_props {
        if let Some(value) = query.prop(prop) {
            filter = filter.must(FilterClause::term(prop, value));
        }
    }

    let ignored: Vec<&str> = query
        .props()
        .iter()
        .map(|(k, _)| k.as_str())
        .filter(|k| !filterable_props.iter().any(|p| p == k))
        .chain(query.terms().iter().map(|t| t.as_str()))
        .collect();
    if !ignored.is_empty() {
        crate::log_debug!(ctx, "QUERY_TERMS_IGNORED", terms = ignored);
    }

    filter
}

/// Parse and build each breakdown, skipping nulls, blanks and name clashes.
fn build_aggregations(
    breakdowns: &[Option<String>],
    options: &TreeOptions,
    ctx: &LogContext,
) -> Result<Vec<AggregationNode>> {
    let mut aggregations: Vec<AggregationNode> = Vec::new();

    for bd in breakdowns {
        let bd = match bd.as_deref().map(str::trim) {
            Some(bd) if !bd.is_empty() => bd,
            _ => {
                log::warn!("{} BREAKDOWN_SKIPPED reason=null_or_blank", ctx);
                continue;
            }
        };

        let bd_ctx = ctx.with_breakdown(bd);
        let spec = parse_breakdown(bd)?;
        let agg = build_aggregation(&spec, options, &bd_ctx)?;

        if aggregations.iter().any(|a| a.name() == agg.name()) {
            log::warn!(
                "{} BREAKDOWN_SKIPPED reason=duplicate_name name={}",
                bd_ctx,
                agg.name()
            );
            continue;
        }
        aggregations.push(agg);
    }

    Ok(aggregations)
}

/// A finalised search request, ready for the search client.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRequest {
    index: String,
    filter: BoolFilter,
    aggregations: Vec<AggregationNode>,
    size: usize,
}

impl CompiledRequest {
    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn filter(&self) -> &BoolFilter {
        &self.filter
    }

    pub fn aggregations(&self) -> &[AggregationNode] {
        &self.aggregations
    }

    /// Number of example documents requested.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The search body: `{size, query, aggs}`.
    pub fn to_json(&self) -> Value {
        json!({
            "size": self.size,
            "query": self.filter.to_json(),
            "aggs": aggregations_json(&self.aggregations),
        })
    }
}
