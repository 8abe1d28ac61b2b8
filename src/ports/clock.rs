//! Clock Port - Source of "now" for time windows and cache freshness.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
