//! Structured logging with request context.
//!
//! Provides a context type that puts the dataspace, request id and
//! breakdown in front of every log message for easy correlation.

pub mod structured;

pub use structured::*;
