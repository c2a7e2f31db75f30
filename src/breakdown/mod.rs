//! Breakdown compilation.
//!
//! Turns breakdown expressions like `evt/time` or `tag/time {count:avg}`
//! into aggregation trees:
//! - Parsing the expression into a `BreakdownSpec`
//! - Building a linear chain of bucket nodes with zero-filtered stats
//! - Injecting one total-count node per distinct top-level terms field

pub mod dedup;
pub mod interval;
pub mod parser;
pub mod tree;

pub use dedup::*;
pub use interval::*;
pub use parser::*;
pub use tree::*;
