//! Search backend request builders.
//!
//! Builds the filter and aggregation request for one breakdown query.
//! Note: executing the search is the caller's job; this module only
//! describes the request and splits the raw response.

pub mod filter;
pub mod json_path;
pub mod models;
pub mod query;
pub mod request;

pub use filter::*;
pub use json_path::*;
pub use models::*;
pub use query::*;
pub use request::*;
