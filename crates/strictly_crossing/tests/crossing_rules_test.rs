//! Tests for the river-crossing puzzle engine.

use proptest::prelude::*;
use strictly_crossing::{
    Bank, BoatAtRest, Crossing, CrossingInvariants, CrossingMove, CrossingState, EveryEntityOnce,
    Invariant, InvariantSet, MoveError, Scenario,
};

fn mv(ids: &[u32]) -> CrossingMove {
    CrossingMove::new(ids.to_vec())
}

#[test]
fn test_single_pair_scenario() {
    let crossing = Crossing::new(2, 2, Scenario::ActorAgent);
    let start = crossing.initial_state();
    assert_eq!(start.boat(), Bank::Left);
    assert_eq!(start.left(), &[1, 2]);

    let done = crossing.apply(&start, &mv(&[1, 2])).unwrap();
    assert_eq!(done.boat(), Bank::Right);
    assert_eq!(done.right(), &[1, 2]);
    assert!(done.left().is_empty());
    assert!(crossing.is_goal(&done));
}

#[test]
fn test_three_pairs_classic_solution() {
    // a_i = 2i-1, A_i = 2i
    let crossing = Crossing::new(6, 2, Scenario::ActorAgent);
    let moves = [
        mv(&[1, 3]),
        mv(&[1]),
        mv(&[1, 5]),
        mv(&[1]),
        mv(&[4, 6]),
        mv(&[4, 3]),
        mv(&[2, 4]),
        mv(&[5]),
        mv(&[1, 3]),
        mv(&[1]),
        mv(&[1, 5]),
    ];

    let mut state = crossing.initial_state();
    for (index, m) in moves.iter().enumerate() {
        assert!(!crossing.is_goal(&state), "goal too early at move {}", index);
        state = crossing
            .apply(&state, m)
            .unwrap_or_else(|e| panic!("move {} ({}) rejected: {}", index, m, e));
    }
    assert!(crossing.is_goal(&state));
}

#[test]
fn test_rejected_crossing_reports_unsafe_bank() {
    let crossing = Crossing::new(6, 3, Scenario::ActorAgent);
    let err = crossing
        .apply(&crossing.initial_state(), &mv(&[1, 4]))
        .unwrap_err();
    assert!(err.to_string().contains("unsafe"));
    assert!(matches!(err, MoveError::Unsafe { .. }));
}

#[test]
fn test_boat_must_return_before_crossing_again() {
    let crossing = Crossing::new(4, 2, Scenario::Unrestricted);
    let state = crossing.apply(&crossing.initial_state(), &mv(&[1])).unwrap();
    assert!(matches!(
        crossing.apply(&state, &mv(&[2])),
        Err(MoveError::NotWithBoat { entity: 2, .. })
    ));
}

#[test]
fn test_validate_state_rejects_unsafe_reset_target() {
    let crossing = Crossing::new(4, 2, Scenario::ActorAgent);
    let unsafe_state = CrossingState::new(Bank::Right, vec![2, 3], vec![1, 4], Vec::new());
    let err = crossing.validate_state(&unsafe_state).unwrap_err();
    assert!(!err.violations.is_empty());

    let fine = CrossingState::new(Bank::Right, vec![3, 4], vec![1, 2], Vec::new());
    assert!(crossing.validate_state(&fine).is_ok());
}

#[test]
fn test_move_deserializes_from_array() {
    let m: CrossingMove = serde_json::from_str("[2, 1]").unwrap();
    assert_eq!(m.passengers(), &[2, 1]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every position reached at rest has an empty boat and puts
    /// each entity on exactly one bank; rejected crossings change nothing.
    #[test]
    fn prop_crossings_keep_positions_at_rest(
        pairs in 1u32..4,
        capacity in 1u32..4,
        unrestricted in any::<bool>(),
        trips in prop::collection::vec(prop::collection::vec(1u32..8, 0..4), 0..40),
    ) {
        let entities = pairs * 2;
        let capacity = capacity.min(entities);
        let scenario = if unrestricted { Scenario::Unrestricted } else { Scenario::ActorAgent };
        let crossing = Crossing::new(entities, capacity, scenario);
        let mut state = crossing.initial_state();

        for trip in trips {
            let before = state.clone();
            match crossing.apply(&state, &CrossingMove::new(trip)) {
                Ok(next) => {
                    prop_assert!(BoatAtRest::holds(&crossing, &next));
                    prop_assert!(EveryEntityOnce::holds(&crossing, &next));
                    prop_assert!(CrossingInvariants::check_all(&crossing, &next).is_ok());
                    prop_assert_ne!(next.boat(), before.boat());
                    state = next;
                }
                Err(_) => prop_assert_eq!(&state, &before),
            }
        }
    }
}
