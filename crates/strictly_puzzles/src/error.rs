//! Simulator error taxonomy.
//!
//! Every variant except [`SimulatorError::InvariantViolation`] is an
//! expected outcome of bad caller input and is reported back as data. An
//! invariant violation means an accepted transition produced a corrupt
//! position, which is a defect in this crate.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Machine-readable error category carried in tool responses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, strum::Display,
)]
pub enum ErrorKind {
    /// Puzzle type, `N` or `k` rejected at creation.
    InvalidParameters,
    /// Move breaks the puzzle rules or the safety predicate.
    IllegalMove,
    /// Session id was never issued, was deleted, or expired.
    UnknownSession,
    /// Supplied reset state fails the puzzle invariants.
    InvalidResetState,
    /// A stored position broke its own invariants.
    InvariantViolation,
}

/// Error raised by the simulator facade and session registry.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SimulatorError {
    /// Puzzle type, `N` or `k` rejected at creation.
    #[display("Invalid parameters: {}", _0)]
    InvalidParameters(String),

    /// Move breaks the puzzle rules or the safety predicate.
    #[display("Illegal move: {}", _0)]
    IllegalMove(String),

    /// Session id was never issued, was deleted, or expired.
    #[display("Unknown session: {}", _0)]
    UnknownSession(String),

    /// Supplied reset state fails the puzzle invariants.
    #[display("Invalid reset state: {}", _0)]
    InvalidResetState(String),

    /// A stored position broke its own invariants.
    #[display("Internal invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for SimulatorError {}

impl SimulatorError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulatorError::InvalidParameters(_) => ErrorKind::InvalidParameters,
            SimulatorError::IllegalMove(_) => ErrorKind::IllegalMove,
            SimulatorError::UnknownSession(_) => ErrorKind::UnknownSession,
            SimulatorError::InvalidResetState(_) => ErrorKind::InvalidResetState,
            SimulatorError::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }

    /// True only for internal defects.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SimulatorError::InvariantViolation(_))
    }

    /// Unknown-session error naming the id.
    pub fn unknown_session(env_id: &str) -> Self {
        SimulatorError::UnknownSession(format!("no live session with id '{}'", env_id))
    }
}

impl From<strictly_hanoi::MoveError> for SimulatorError {
    fn from(err: strictly_hanoi::MoveError) -> Self {
        match err {
            strictly_hanoi::MoveError::InvariantViolation(msg) => {
                SimulatorError::InvariantViolation(msg)
            }
            other => SimulatorError::IllegalMove(other.to_string()),
        }
    }
}

impl From<strictly_crossing::MoveError> for SimulatorError {
    fn from(err: strictly_crossing::MoveError) -> Self {
        match err {
            strictly_crossing::MoveError::InvariantViolation(msg) => {
                SimulatorError::InvariantViolation(msg)
            }
            other => SimulatorError::IllegalMove(other.to_string()),
        }
    }
}

impl From<strictly_hanoi::StateError> for SimulatorError {
    fn from(err: strictly_hanoi::StateError) -> Self {
        SimulatorError::InvalidResetState(err.to_string())
    }
}

impl From<strictly_crossing::StateError> for SimulatorError {
    fn from(err: strictly_crossing::StateError) -> Self {
        SimulatorError::InvalidResetState(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_errors_become_illegal_moves() {
        let err: SimulatorError = strictly_hanoi::MoveError::SamePeg(1).into();
        assert_eq!(err.kind(), ErrorKind::IllegalMove);
        assert!(!err.is_fatal());

        let err: SimulatorError = strictly_crossing::MoveError::EmptyBoat.into();
        assert_eq!(err.kind(), ErrorKind::IllegalMove);
    }

    #[test]
    fn test_postcondition_failures_are_fatal() {
        let err: SimulatorError =
            strictly_hanoi::MoveError::InvariantViolation("corrupt".into()).into();
        assert!(err.is_fatal());
        assert_eq!(err.kind().to_string(), "InvariantViolation");
    }
}
