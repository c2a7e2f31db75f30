//! Breakdown query compilation.
//!
//! Drives the request assembler for one resolved query:
//! 1. Resolve defaults (`QueryContext`)
//! 2. Configure a `RequestDraft`
//! 3. Finalise it into a `CompiledRequest`

use chrono::Utc;

use crate::config::CompilerConfig;
use crate::error::Result;
use crate::storage::request::{CompiledRequest, RequestDraft};

use super::context::{BreakdownQuery, QueryContext};

/// Compile a resolved query into a search request.
pub fn compile_context(ctx: &QueryContext, config: &CompilerConfig) -> Result<CompiledRequest> {
    let log_ctx = ctx.log_context();

    log::info!(
        "{} QUERY_RECEIVED start={} end={} breakdowns={} interval={}",
        log_ctx,
        ctx.start.to_rfc3339(),
        ctx.end.to_rfc3339(),
        ctx.breakdowns.len(),
        ctx.interval
    );

    let compiled = RequestDraft::new(ctx.dataspace.clone())
        .index_prefix(&config.index_prefix)
        .log_context(log_ctx.clone())
        .result_ceiling(ctx.result_ceiling)
        .example_ceiling(ctx.example_ceiling)
        .time_window(ctx.start, ctx.end)
        .query(ctx.query.clone())
        .breakdowns(ctx.breakdowns.clone())
        .interval(ctx.interval)
        .filterable_props(config.filterable_props.clone())
        .prepare_search();

    if let Err(e) = &compiled {
        log::warn!("{} QUERY_REJECTED error={}", log_ctx, e);
    }
    compiled
}

/// Resolve defaults and compile an inbound query.
pub fn compile_query(query: &BreakdownQuery, config: &CompilerConfig) -> Result<CompiledRequest> {
    let ctx = QueryContext::from_query(query, config, Utc::now())?;
    compile_context(&ctx, config)
}
