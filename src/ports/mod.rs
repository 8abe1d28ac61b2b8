//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SurveyApi` - Survey structure, raw response and catalogue reads
//! - `AggregateCache` - Key-value store for aggregated results
//! - `Clock` - Injected time source

mod aggregate_cache;
mod clock;
mod survey_api;

pub use aggregate_cache::{AggregateCache, CacheError};
pub use clock::Clock;
pub use survey_api::{
    ResponseQuery, SortOrder, SurveyApi, SurveyApiError, SurveyListQuery,
};
