//! Error types.
//!
//! Precondition violations on events, breakdown parse failures and request
//! assembly failures. Data-quality problems (null breakdowns, numeric ops on
//! non-numeric fields) are logged as warnings instead.

use thiserror::Error;

/// Rejected event construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("dataspace must not be empty")]
    EmptyDataspace,

    #[error("invalid dataspace {dataspace:?}: must not contain '/'")]
    InvalidDataspace { dataspace: String },

    #[error("event type must not be blank")]
    BlankEventType,

    #[error("count must be finite, got {count}")]
    NonFiniteCount { count: f64 },

    #[error("property {key:?} must be finite, got {value}")]
    NonFiniteProperty { key: String, value: f64 },
}

/// Failure to turn a breakdown expression into an aggregation tree.
#[derive(Error, Debug)]
pub enum BreakdownError {
    #[error("breakdown {breakdown:?} does not match field(/field)* [{{json}}]")]
    Syntax { breakdown: String },

    #[error("breakdown {breakdown:?} has invalid field {field:?}")]
    InvalidField { breakdown: String, field: String },

    #[error("breakdown {breakdown:?} has a malformed report spec: {source}")]
    MalformedReportSpec {
        breakdown: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("breakdown has no bucket fields")]
    EmptyChain,
}

/// Failure to assemble a search request.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid event data: {0}")]
    Event(#[from] EventError),

    #[error("invalid breakdown: {0}")]
    Breakdown(#[from] BreakdownError),

    #[error("time window start {start} is not before end {end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("invalid interval {0:?}")]
    InvalidInterval(String),

    #[error("malformed request: {0}")]
    MalformedRequest(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RequestError>;
