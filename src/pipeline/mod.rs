//! Query compilation pipeline.
//!
//! Turns an inbound breakdown query into a search request:
//! - Defaults for dataspace, time window, breakdowns and ceilings
//! - Free-text query parsing
//! - Breakdown parsing and aggregation building
//! - Total-count injection
//! - Request assembly

pub mod compile;
pub mod context;

pub use compile::*;
pub use context::*;
