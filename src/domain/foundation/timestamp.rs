//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// Domain code should not call this directly; go through a `Clock`.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 string, normalizing any offset to UTC.
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Parses an ISO 8601 date or date-time.
    ///
    /// Values with an offset go through RFC 3339; values without one
    /// (`2024-06-15T12:00:00`, `2024-06-15 12:00:00.5`, `2024-06-15`) are
    /// read as UTC.
    pub fn parse_iso8601(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(parsed) = Self::parse_rfc3339(value) {
            return Some(parsed);
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| Self(naive.and_utc()))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is strictly after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by subtracting a duration.
    pub fn minus(&self, duration: Duration) -> Self {
        Self(self.0 - duration)
    }

    /// Creates a new timestamp by adding a duration.
    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        self.minus(Duration::days(days))
    }

    /// Creates a new timestamp one calendar year earlier.
    ///
    /// Feb 29 maps to Feb 28 of the previous year.
    pub fn minus_years(&self, years: u32) -> Self {
        self.0
            .checked_sub_months(Months::new(years * 12))
            .map(Self)
            .unwrap_or_else(|| self.minus_days(365 * i64::from(years)))
    }

    /// Creates a new timestamp by adding the specified number of minutes.
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        self.plus(Duration::minutes(minutes))
    }

    /// Formats the timestamp with a chrono format string.
    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
