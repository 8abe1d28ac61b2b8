//! Aggregation module - Turns raw responses into per-question statistics.
//!
//! # Pipeline
//!
//! 1. [`filter_by_time_range`] trims responses to a recency window
//! 2. [`LabelMaps::resolve`] derives question and choice texts from structure
//! 3. [`aggregate_responses`] (or [`aggregate_fallback`]) counts labels and
//!    computes percentages
//!
//! Results are cached as [`CacheEntry`] values under a [`CacheKey`].

mod aggregator;
mod cache_entry;
mod counter;
mod labels;
mod status;
mod summary;
mod time_range;
mod trend;

pub use aggregator::{
    aggregate_fallback, aggregate_responses, aggregate_with, AggregatedAnswer,
    AggregatedQuestion, FirstSeenLabels, LabelStrategy, StructuredLabels,
};
pub use cache_entry::{CacheEntry, CacheKey};
pub use counter::LabelCounter;
pub use labels::{LabelMaps, QuestionLabel};
pub use status::FetchStatus;
pub use summary::{PopularAnswer, SummaryStats};
pub use time_range::{filter_by_time_range, TimeRange};
pub use trend::{response_trend, TrendGranularity, TrendPoint};
