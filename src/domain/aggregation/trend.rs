//! Response volume over time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::time_range::TimeRange;
use crate::domain::survey::SurveyResponse;

/// Bucket width used when grouping responses by time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendGranularity {
    Hour,
    Day,
    Month,
}

impl TrendGranularity {
    pub fn for_range(range: &TimeRange) -> Self {
        match range {
            TimeRange::LastDay => Self::Hour,
            TimeRange::LastYear => Self::Month,
            TimeRange::LastWeek | TimeRange::LastMonth | TimeRange::Unfiltered(_) => Self::Day,
        }
    }

    // Zero-padded formats sort lexicographically in time order.
    fn format(&self) -> &'static str {
        match self {
            Self::Hour => "%Y-%m-%d %H:00",
            Self::Day => "%Y-%m-%d",
            Self::Month => "%Y-%m",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub bucket: String,
    pub count: u64,
}

/// Counts responses per time bucket, oldest bucket first.
///
/// Responses without a usable timestamp are skipped.
pub fn response_trend(responses: &[SurveyResponse], range: &TimeRange) -> Vec<TrendPoint> {
    let format = TrendGranularity::for_range(range).format();
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();

    for timestamp in responses.iter().filter_map(SurveyResponse::effective_timestamp) {
        *buckets.entry(timestamp.format(format)).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(bucket, count)| TrendPoint { bucket, count })
        .collect()
}
