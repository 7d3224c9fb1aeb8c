//! Hoare-style contracts for state transitions.

/// A contract defines preconditions and postconditions for state transitions
/// under a set of puzzle rules.
///
/// Contracts formalize Hoare-style reasoning:
/// - Precondition: {P(rules, state, action)} - must hold before applying action
/// - Postcondition: {Q(rules, before, after)} - must hold after applying action
pub trait Contract<R, S, A> {
    /// Error reported when a condition fails.
    type Error;

    /// Checks preconditions before applying the action.
    fn pre(rules: &R, state: &S, action: &A) -> Result<(), Self::Error>;

    /// Checks postconditions after applying the action.
    ///
    /// This verifies that the transition maintained the puzzle's invariants.
    fn post(rules: &R, before: &S, after: &S) -> Result<(), Self::Error>;
}
