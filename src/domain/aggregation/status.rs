//! FetchStatus enum tracking one aggregated-data request.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Status of the latest aggregated-data request.
///
/// `Fresh`, `Cached`, `Fallback` and `Error` settle a request; any new
/// request (including a refresh or retry) restarts at `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Fresh,
    Cached,
    Fallback,
    Error,
}

impl FetchStatus {
    /// Returns true once a request has produced an outcome.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            FetchStatus::Fresh | FetchStatus::Cached | FetchStatus::Fallback | FetchStatus::Error
        )
    }

    /// Returns true if data is available to show.
    pub fn has_data(&self) -> bool {
        matches!(
            self,
            FetchStatus::Fresh | FetchStatus::Cached | FetchStatus::Fallback
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Fresh => "fresh",
            FetchStatus::Cached => "cached",
            FetchStatus::Fallback => "fallback",
            FetchStatus::Error => "error",
        }
    }
}

impl StateMachine for FetchStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use FetchStatus::*;
        match self {
            Idle => matches!(target, Loading | Cached),
            // A superseding request may restart while one is in flight.
            Loading => matches!(target, Loading | Fresh | Cached | Fallback | Error),
            Fresh | Cached | Fallback | Error => matches!(target, Loading),
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use FetchStatus::*;
        match self {
            Idle => vec![Loading, Cached],
            Loading => vec![Loading, Fresh, Cached, Fallback, Error],
            Fresh | Cached | Fallback | Error => vec![Loading],
        }
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
