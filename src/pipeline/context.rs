//! Query context management.
//!
//! Decodes the inbound breakdown query and fills in defaults.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::breakdown::interval::Interval;
use crate::config::CompilerConfig;
use crate::error::{RequestError, Result};
use crate::event::dataspace::Dataspace;
use crate::logging::structured::LogContext;
use crate::storage::query::SearchQuery;
use crate::storage::request::default_time_window;

/// Inbound query, as sent by the request-handling layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreakdownQuery {
    pub dataspace: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default, alias = "query")]
    pub q: Option<String>,
    #[serde(alias = "breakdowns")]
    pub breakdown: Option<Vec<Option<String>>>,
    /// Max buckets per terms node.
    pub size: Option<usize>,
    /// Max example documents.
    pub examples: Option<usize>,
    pub interval: Option<String>,
}

/// A query with every default resolved.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub request_id: String,
    pub dataspace: Dataspace,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub query: SearchQuery,
    pub breakdowns: Vec<Option<String>>,
    pub result_ceiling: usize,
    pub example_ceiling: usize,
    pub interval: Interval,
}

impl QueryContext {
    /// Resolve `query` against `config`; `now` anchors the default window.
    pub fn from_query(
        query: &BreakdownQuery,
        config: &CompilerConfig,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let request_id = format!("req-{}", &Uuid::new_v4().to_string()[..8]);

        let dataspace = Dataspace::new(
            query
                .dataspace
                .as_deref()
                .unwrap_or(&config.default_dataspace),
        )?;

        let end = match &query.end {
            Some(ts) => parse_timestamp(ts)?,
            None => now,
        };
        let start = match &query.start {
            Some(ts) => parse_timestamp(ts)?,
            None => default_time_window(end).0,
        };

        let interval = match &query.interval {
            Some(text) => text.parse()?,
            None => config.default_interval,
        };

        let breakdowns = query.breakdown.clone().unwrap_or_else(|| {
            config
                .default_breakdowns
                .iter()
                .map(|b| Some(b.clone()))
                .collect()
        });

        Ok(Self {
            request_id,
            dataspace,
            start,
            end,
            query: SearchQuery::parse(query.q.as_deref().unwrap_or("")),
            breakdowns,
            result_ceiling: query.size.unwrap_or(config.result_ceiling),
            example_ceiling: query.examples.unwrap_or(config.example_ceiling),
            interval,
        })
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(self.dataspace.as_str()).with_request(&self.request_id)
    }
}

fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RequestError::InvalidTimestamp {
            value: ts.to_string(),
            reason: e.to_string(),
        })
}
