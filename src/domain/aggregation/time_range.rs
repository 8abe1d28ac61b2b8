//! Relative time windows and the response filter built on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::Timestamp;
use crate::domain::survey::{ResponseDate, SurveyResponse};

/// Recency window applied to raw responses before aggregation.
///
/// Unrecognized window names are kept verbatim (they still take part in
/// cache keys) and disable filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeRange {
    LastDay,
    LastWeek,
    LastMonth,
    LastYear,
    Unfiltered(String),
}

impl TimeRange {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "1d" => Self::LastDay,
            "7d" => Self::LastWeek,
            "30d" => Self::LastMonth,
            "1y" => Self::LastYear,
            other => Self::Unfiltered(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::LastDay => "1d",
            Self::LastWeek => "7d",
            Self::LastMonth => "30d",
            Self::LastYear => "1y",
            Self::Unfiltered(raw) => raw,
        }
    }

    /// Responses must be strictly newer than this instant; `None` keeps all.
    pub fn cutoff(&self, now: Timestamp) -> Option<Timestamp> {
        match self {
            Self::LastDay => Some(now.minus_days(1)),
            Self::LastWeek => Some(now.minus_days(7)),
            Self::LastMonth => Some(now.minus_days(30)),
            Self::LastYear => Some(now.minus_years(1)),
            Self::Unfiltered(_) => None,
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::LastWeek
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for TimeRange {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.as_str().to_string()
    }
}

/// Keeps responses whose effective timestamp is strictly after the cutoff.
///
/// Responses without any date are kept; responses whose date cannot be read
/// are dropped. Input order is preserved.
pub fn filter_by_time_range(
    responses: Vec<SurveyResponse>,
    range: &TimeRange,
    now: Timestamp,
) -> Vec<SurveyResponse> {
    let Some(cutoff) = range.cutoff(now) else {
        return responses;
    };

    responses
        .into_iter()
        .filter(|response| match response.response_date() {
            ResponseDate::Missing => true,
            ResponseDate::Invalid(_) => false,
            ResponseDate::At(at) => at.is_after(&cutoff),
        })
        .collect()
}
