//! Maps the `time_range` query value to an absolute reporting window.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Symbolic report range requested by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// Parse a client-supplied token.
    ///
    /// Only exact `week` and `year` are recognized. Anything else, including
    /// an absent value, falls back to `Month` rather than being rejected.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some("week") => TimeRange::Week,
            Some("year") => TimeRange::Year,
            _ => TimeRange::Month,
        }
    }

    /// Fixed look-back length.
    pub fn lookback(self) -> Duration {
        match self {
            TimeRange::Week => Duration::days(7),
            TimeRange::Month => Duration::days(30),
            TimeRange::Year => Duration::days(365),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
        };
        f.write_str(name)
    }
}

/// Inclusive `[start, end]` interval of record creation timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window of `range` ending at `now`.
    ///
    /// Returns `None` only if `now - lookback` is not representable.
    pub fn ending_at(range: TimeRange, now: DateTime<Utc>) -> Option<Self> {
        let start = now.checked_sub_signed(range.lookback())?;
        Some(Self { start, end: now })
    }

    #[cfg(test)]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}
