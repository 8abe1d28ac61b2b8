//! Clock adapters.

use chrono::Duration;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually controlled time for tests. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<Timestamp>>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Timestamp> {
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set(&self, now: Timestamp) {
        *self.guard() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.guard();
        *now = now.plus(by);
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.guard()
    }
}
