//! Structured logging utilities.
//!
//! Provides context-aware logging with the dataspace, request id and
//! breakdown included in every log message.

use std::fmt;

/// Logging context for one breakdown query.
#[derive(Debug, Clone, PartialEq)]
pub struct LogContext {
    pub dataspace: String,
    pub request_id: Option<String>,
    pub breakdown: Option<String>,
}

impl LogContext {
    pub fn new(dataspace: &str) -> Self {
        Self {
            dataspace: dataspace.to_string(),
            request_id: None,
            breakdown: None,
        }
    }

    pub fn with_request(&self, request_id: &str) -> Self {
        Self {
            request_id: Some(request_id.to_string()),
            ..self.clone()
        }
    }

    pub fn with_breakdown(&self, breakdown: &str) -> Self {
        Self {
            breakdown: Some(breakdown.to_string()),
            ..self.clone()
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[dataspace={}]", self.dataspace)?;
        if let Some(rid) = &self.request_id {
            write!(f, " [request={}]", rid)?;
        }
        if let Some(bd) = &self.breakdown {
            write!(f, " [breakdown={}]", bd)?;
        }
        Ok(())
    }
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}
