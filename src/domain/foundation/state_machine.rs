//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions for lifecycle statuses such as the fetch status of a request.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// ```ignore
/// let status = FetchStatus::Idle.transition_to(FetchStatus::Loading)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state has no valid outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        Warming,
        On,
        Burnt,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use Light::*;
            match self {
                Off => vec![Warming],
                Warming => vec![On, Burnt],
                On => vec![Off, Burnt],
                Burnt => vec![],
            }
        }
    }

    #[test]
    fn valid_transition_returns_target() {
        assert_eq!(Light::Off.transition_to(Light::Warming), Ok(Light::Warming));
    }

    #[test]
    fn invalid_transition_is_rejected_with_both_states_named() {
        let err = Light::Off.transition_to(Light::On).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Off"));
        assert!(message.contains("On"));
    }

    #[test]
    fn state_without_exits_is_terminal() {
        assert!(Light::Burnt.is_terminal());
        assert!(!Light::On.is_terminal());
    }
}
