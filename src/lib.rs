//! DataLog Core - breakdown compiler and event model
//!
//! This crate compiles breakdown expressions (`evt/time`,
//! `tag/time {count:avg}`) into search-backend aggregation requests, and
//! defines the canonical event identity and encoding those aggregations run
//! over. It performs no I/O: the caller executes the request and renders
//! the results.
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `event` - Event model, identity hashing, compact encoding
//! - `breakdown` - DSL parser, aggregation tree builder, total-count dedup
//! - `storage` - Filters, free-text queries, request assembly, result pass-through
//! - `pipeline` - Inbound query decoding and compilation
//! - `config` - Defaults and environment overrides
//! - `logging` - Structured logging with request context

pub mod breakdown;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod pipeline;
pub mod storage;

use serde_json::Value;

use config::CompilerConfig;
use error::Result;
use pipeline::compile::compile_query;
use pipeline::context::BreakdownQuery;
use storage::models::SearchResults;

/// Initialize the module-level logger
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Compile a breakdown query into a search request.
///
/// Main entry point for the request-handling layer. Takes the inbound query
/// as JSON and returns `{"index": ..., "body": ...}` for the search client.
///
/// # Arguments
/// * `request_json` - `{dataspace?, start?, end?, q?, breakdown?, size?, examples?, interval?}`
///
/// # Example
/// ```
/// let request = datalog_core::compile_breakdown_request(
///     r#"{"dataspace": "default", "breakdown": ["evt/time", "evt/host"]}"#,
/// ).unwrap();
/// assert_eq!(request["index"], "datalog.default");
/// assert_eq!(request["body"]["aggs"].as_object().unwrap().len(), 3);
/// ```
pub fn compile_breakdown_request(request_json: &str) -> Result<Value> {
    init_logger();

    let query: BreakdownQuery = serde_json::from_str(request_json)?;
    let config = CompilerConfig::from_env();
    let compiled = compile_query(&query, &config)?;

    Ok(serde_json::json!({
        "index": compiled.index(),
        "body": compiled.to_json(),
    }))
}

/// Split a raw search response into the payload for the rendering layer.
///
/// The aggregation tree is passed through unchanged, with the matching
/// documents added under `examples`.
pub fn search_response_payload(response_json: &str) -> Result<Value> {
    let response: Value = serde_json::from_str(response_json)?;
    Ok(SearchResults::from_response(&response).into_payload())
}
