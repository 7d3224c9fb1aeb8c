//! First-class invariants.
//!
//! Invariants are checked against a position together with the engine that
//! owns it, since what counts as a valid position depends on the puzzle size.

/// A logical property that must hold for every position at rest.
pub trait Invariant<P, S> {
    /// Checks if the invariant holds for the given state.
    fn holds(params: &P, state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Joins violation descriptions with `; `.
    pub fn join(violations: &[InvariantViolation]) -> String {
        violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples of two to four invariants.
pub trait InvariantSet<P, S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(params: &P, state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(checks: &[(bool, &'static str)]) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = checks
        .iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(*description))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

// Implement InvariantSet for 2-tuples
impl<P, S, I1, I2> InvariantSet<P, S> for (I1, I2)
where
    I1: Invariant<P, S>,
    I2: Invariant<P, S>,
{
    fn check_all(params: &P, state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect(&[
            (I1::holds(params, state), I1::description()),
            (I2::holds(params, state), I2::description()),
        ])
    }
}

// Implement InvariantSet for 3-tuples
impl<P, S, I1, I2, I3> InvariantSet<P, S> for (I1, I2, I3)
where
    I1: Invariant<P, S>,
    I2: Invariant<P, S>,
    I3: Invariant<P, S>,
{
    fn check_all(params: &P, state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect(&[
            (I1::holds(params, state), I1::description()),
            (I2::holds(params, state), I2::description()),
            (I3::holds(params, state), I3::description()),
        ])
    }
}

// Implement InvariantSet for 4-tuples
impl<P, S, I1, I2, I3, I4> InvariantSet<P, S> for (I1, I2, I3, I4)
where
    I1: Invariant<P, S>,
    I2: Invariant<P, S>,
    I3: Invariant<P, S>,
    I4: Invariant<P, S>,
{
    fn check_all(params: &P, state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect(&[
            (I1::holds(params, state), I1::description()),
            (I2::holds(params, state), I2::description()),
            (I3::holds(params, state), I3::description()),
            (I4::holds(params, state), I4::description()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NonEmpty;

    impl Invariant<(), Vec<u32>> for NonEmpty {
        fn holds(_params: &(), state: &Vec<u32>) -> bool {
            !state.is_empty()
        }

        fn description() -> &'static str {
            "State must not be empty"
        }
    }

    struct Sorted;

    impl Invariant<(), Vec<u32>> for Sorted {
        fn holds(_params: &(), state: &Vec<u32>) -> bool {
            state.windows(2).all(|pair| pair[0] <= pair[1])
        }

        fn description() -> &'static str {
            "State must be sorted"
        }
    }

    struct Bounded;

    impl Invariant<u32, Vec<u32>> for Bounded {
        fn holds(params: &u32, state: &Vec<u32>) -> bool {
            state.iter().all(|v| v <= params)
        }

        fn description() -> &'static str {
            "Values must not exceed the bound"
        }
    }

    #[test]
    fn test_set_collects_every_violation() {
        type Checks = (NonEmpty, Sorted);
        assert!(Checks::check_all(&(), &vec![1, 2]).is_ok());

        let violations = Checks::check_all(&(), &vec![2, 1]).unwrap_err();
        assert_eq!(violations, vec![InvariantViolation::new(Sorted::description())]);
    }

    #[test]
    fn test_invariants_see_params() {
        assert!(Bounded::holds(&3, &vec![1, 3]));
        assert!(!Bounded::holds(&2, &vec![1, 3]));
    }

    #[test]
    fn test_join_descriptions() {
        let joined = InvariantViolation::join(&[
            InvariantViolation::new("first"),
            InvariantViolation::new("second"),
        ]);
        assert_eq!(joined, "first; second");
        assert_eq!(InvariantViolation::new("only").to_string(), "only");
    }
}
