//! First-class invariants for the river-crossing puzzle.

use super::rules::Crossing;
use super::types::{Bank, CrossingState};
use strictly_contracts::Invariant;

/// Invariant: each entity `1..=N` stands on exactly one bank.
pub struct EveryEntityOnce;

impl Invariant<Crossing, CrossingState> for EveryEntityOnce {
    fn holds(params: &Crossing, state: &CrossingState) -> bool {
        let mut all: Vec<u32> = state.left().iter().chain(state.right()).copied().collect();
        all.sort_unstable();
        all.len() == params.entities() as usize
            && all.iter().zip(1..=params.entities()).all(|(a, b)| *a == b)
    }

    fn description() -> &'static str {
        "Every entity from 1 to N must be on exactly one bank"
    }
}

/// Invariant: the boat is empty between crossings.
pub struct BoatAtRest;

impl Invariant<Crossing, CrossingState> for BoatAtRest {
    fn holds(_params: &Crossing, state: &CrossingState) -> bool {
        state.boat_occupants().is_empty()
    }

    fn description() -> &'static str {
        "Boat must be empty between crossings"
    }
}

/// Invariant: the boat never carries more than `k` entities.
pub struct BoatWithinCapacity;

impl Invariant<Crossing, CrossingState> for BoatWithinCapacity {
    fn holds(params: &Crossing, state: &CrossingState) -> bool {
        state.boat_occupants().len() <= params.capacity() as usize
    }

    fn description() -> &'static str {
        "Boat occupants must not exceed capacity"
    }
}

/// Invariant: the safety predicate holds on both banks.
pub struct BanksSafe;

impl Invariant<Crossing, CrossingState> for BanksSafe {
    fn holds(params: &Crossing, state: &CrossingState) -> bool {
        [Bank::Left, Bank::Right]
            .into_iter()
            .all(|side| params.safety().is_safe(state.bank(side)))
    }

    fn description() -> &'static str {
        "No bank may hold a forbidden group"
    }
}

/// All crossing puzzle invariants as a composable set.
pub type CrossingInvariants = (EveryEntityOnce, BoatAtRest, BoatWithinCapacity, BanksSafe);
