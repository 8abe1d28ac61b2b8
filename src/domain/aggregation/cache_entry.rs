//! Cache value types for aggregated survey data.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::aggregator::AggregatedQuestion;
use super::time_range::TimeRange;
use crate::domain::foundation::{SurveyId, Timestamp};
use crate::domain::survey::SurveyResponse;

const KEY_NAMESPACE: &str = "survey";

/// Composite cache key for one (survey, threshold, time range) tuple.
///
/// Components are joined with `:`; any `%` or `:` inside a component is
/// percent-escaped so distinct tuples never produce the same key and a
/// survey's purge prefix never matches another survey.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(survey_id: &SurveyId, threshold: u32, time_range: &TimeRange) -> Self {
        Self(format!(
            "{}{}:{}",
            Self::survey_prefix(survey_id),
            threshold,
            escape(time_range.as_str())
        ))
    }

    /// Prefix shared by every key of one survey.
    pub fn survey_prefix(survey_id: &SurveyId) -> String {
        format!("{}:{}:", KEY_NAMESPACE, escape(survey_id.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(component: &str) -> String {
    component.replace('%', "%25").replace(':', "%3A")
}

/// Snapshot of one successful fresh aggregation.
///
/// Entries are never mutated after being written; a refresh writes a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub question_data: Vec<AggregatedQuestion>,
    pub title: String,
    pub raw_responses: Vec<SurveyResponse>,
    pub cached_at: Timestamp,
}

impl CacheEntry {
    /// True while the entry's age is strictly below `ttl`.
    pub fn is_fresh(&self, now: Timestamp, ttl: Duration) -> bool {
        now.duration_since(&self.cached_at) < ttl
    }
}
