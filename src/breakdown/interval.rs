//! Time-bucket intervals.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;

use crate::error::RequestError;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// A fixed, positive time-bucket width in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    seconds: i64,
}

impl Interval {
    pub const MINUTE: Interval = Interval { seconds: MINUTE };
    pub const HOUR: Interval = Interval { seconds: HOUR };
    pub const DAY: Interval = Interval { seconds: DAY };
    pub const WEEK: Interval = Interval { seconds: WEEK };

    pub fn from_seconds(seconds: i64) -> Option<Self> {
        (seconds > 0).then_some(Self { seconds })
    }

    pub fn as_duration(&self) -> Duration {
        Duration::seconds(self.seconds)
    }

    /// Backend `fixed_interval` form using the largest exact unit.
    pub fn to_fixed_interval(&self) -> String {
        let s = self.seconds;
        if s % DAY == 0 {
            format!("{}d", s / DAY)
        } else if s % HOUR == 0 {
            format!("{}h", s / HOUR)
        } else if s % MINUTE == 0 {
            format!("{}m", s / MINUTE)
        } else {
            format!("{}s", s)
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::DAY
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed_interval())
    }
}

impl FromStr for Interval {
    type Err = RequestError;

    /// Accepts `minute`, `hour`, `day`, `week` or `<n><s|m|h|d|w>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_lowercase();
        let named = match text.as_str() {
            "minute" => Some(Interval::MINUTE),
            "hour" => Some(Interval::HOUR),
            "day" => Some(Interval::DAY),
            "week" => Some(Interval::WEEK),
            _ => None,
        };
        if let Some(interval) = named {
            return Ok(interval);
        }

        let invalid = || RequestError::InvalidInterval(s.to_string());
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (digits, unit) = text.split_at(split);
        let n: i64 = digits.parse().map_err(|_| invalid())?;
        let unit_secs = match unit {
            "s" => 1,
            "m" => MINUTE,
            "h" => HOUR,
            "d" => DAY,
            "w" => WEEK,
            _ => return Err(invalid()),
        };
        n.checked_mul(unit_secs)
            .and_then(Interval::from_seconds)
            .ok_or_else(invalid)
    }
}
