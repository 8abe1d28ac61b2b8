//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `survey_monkey` - Survey provider client and its test double
//! - `cache` - Aggregate cache backends (memory, file, Redis)
//! - `clock` - System and fixed clocks

pub mod cache;
pub mod clock;
pub mod survey_monkey;

pub use cache::{FileAggregateCache, InMemoryAggregateCache, RedisAggregateCache};
pub use clock::{FixedClock, SystemClock};
pub use survey_monkey::{MockSurveyApi, SurveyMonkeyClient, SurveyMonkeyConfig};
