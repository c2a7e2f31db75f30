//! Compiler configuration.
//!
//! Defaults applied to inbound queries that leave a setting out. Each value
//! can be overridden from the environment:
//! - `DATALOG_DEFAULT_DATASPACE`
//! - `DATALOG_DEFAULT_INTERVAL` (e.g. `hour`, `6h`)
//! - `DATALOG_RESULT_CEILING`
//! - `DATALOG_EXAMPLE_CEILING`
//! - `DATALOG_FILTERABLE_PROPS` (space or comma separated)

use std::env;
use std::str::FromStr;

use crate::breakdown::interval::Interval;
use crate::event::dataspace::INDEX_PREFIX;
use crate::storage::request::{DEFAULT_EXAMPLE_CEILING, DEFAULT_FILTERABLE_PROPS};

/// Breakdowns used when a query names none.
pub const DEFAULT_BREAKDOWNS: &[&str] = &[
    "evt/time",
    "evt/host",
    "publisher",
    "host",
    "domain",
    "variant",
];

pub const DEFAULT_DATASPACE: &str = "default";
pub const DEFAULT_RESULT_CEILING: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CompilerConfig {
    pub default_dataspace: String,
    pub default_breakdowns: Vec<String>,
    pub default_interval: Interval,
    pub result_ceiling: usize,
    pub example_ceiling: usize,
    pub filterable_props: Vec<String>,
    pub index_prefix: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_dataspace: DEFAULT_DATASPACE.to_string(),
            default_breakdowns: DEFAULT_BREAKDOWNS.iter().map(|s| s.to_string()).collect(),
            default_interval: Interval::default(),
            result_ceiling: DEFAULT_RESULT_CEILING,
            example_ceiling: DEFAULT_EXAMPLE_CEILING,
            filterable_props: DEFAULT_FILTERABLE_PROPS.iter().map(|s| s.to_string()).collect(),
            index_prefix: INDEX_PREFIX.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Defaults overridden by any `DATALOG_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ds) = lookup("DATALOG_DEFAULT_DATASPACE") {
            if !ds.trim().is_empty() {
                config.default_dataspace = ds.trim().to_string();
            }
        }
        if let Some(interval) = parse_var(&lookup, "DATALOG_DEFAULT_INTERVAL") {
            config.default_interval = interval;
        }
        if let Some(n) = parse_var(&lookup, "DATALOG_RESULT_CEILING") {
            config.result_ceiling = n;
        }
        if let Some(n) = parse_var(&lookup, "DATALOG_EXAMPLE_CEILING") {
            config.example_ceiling = n;
        }
        if let Some(props) = lookup("DATALOG_FILTERABLE_PROPS") {
            config.filterable_props = props
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
        }

        config
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("CONFIG_VALUE_IGNORED key={} value={:?}", key, raw);
            None
        }
    }
}
