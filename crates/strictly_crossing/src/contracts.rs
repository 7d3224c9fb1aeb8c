//! Contract-based validation for crossings.
//!
//! Preconditions are checked against the position before the trip; the
//! safety rule is a postcondition because it concerns the banks once the
//! boat has landed.

use super::action::{CrossingMove, MoveError};
use super::invariants::CrossingInvariants;
use super::rules::Crossing;
use super::types::{Bank, CrossingState, EntityId};
use std::collections::HashSet;
use strictly_contracts::{Contract, InvariantSet, InvariantViolation};
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Loading Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the boat carries at least one entity.
pub struct BoatNotEmpty;

impl BoatNotEmpty {
    /// Rejects an empty passenger list.
    pub fn check(mov: &CrossingMove) -> Result<(), MoveError> {
        if mov.passengers().is_empty() {
            Err(MoveError::EmptyBoat)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the passenger count does not exceed the capacity.
pub struct WithinCapacity;

impl WithinCapacity {
    /// Rejects overloaded boats.
    pub fn check(rules: &Crossing, mov: &CrossingMove) -> Result<(), MoveError> {
        let count = mov.passengers().len();
        if count > rules.capacity() as usize {
            Err(MoveError::OverCapacity {
                count,
                capacity: rules.capacity(),
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: every passenger is an entity of this puzzle.
pub struct KnownPassengers;

impl KnownPassengers {
    /// Rejects ids outside `1..=N`.
    pub fn check(rules: &Crossing, mov: &CrossingMove) -> Result<(), MoveError> {
        match mov
            .passengers()
            .iter()
            .find(|&&id| id == 0 || id > rules.entities())
        {
            Some(&id) => Err(MoveError::UnknownEntity(id)),
            None => Ok(()),
        }
    }
}

/// Precondition: no passenger is listed twice.
pub struct DistinctPassengers;

impl DistinctPassengers {
    /// Rejects duplicate ids.
    pub fn check(mov: &CrossingMove) -> Result<(), MoveError> {
        let mut seen = HashSet::with_capacity(mov.passengers().len());
        match mov.passengers().iter().find(|&&id| !seen.insert(id)) {
            Some(&id) => Err(MoveError::DuplicatePassenger(id)),
            None => Ok(()),
        }
    }
}

/// Precondition: every passenger stands on the bank where the boat is.
pub struct PassengersWithBoat;

impl PassengersWithBoat {
    /// Rejects passengers on the far bank.
    pub fn check(mov: &CrossingMove, state: &CrossingState) -> Result<(), MoveError> {
        let boat = state.boat();
        let near: HashSet<EntityId> = state.bank(boat).iter().copied().collect();
        let far: HashSet<EntityId> = state.bank(boat.opposite()).iter().copied().collect();
        for &entity in mov.passengers() {
            if near.contains(&entity) {
                continue;
            }
            if far.contains(&entity) {
                return Err(MoveError::NotWithBoat {
                    entity,
                    side: boat.opposite(),
                    boat,
                });
            }
            return Err(MoveError::UnknownEntity(entity));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Composite Precondition
// ─────────────────────────────────────────────────────────────

/// Composite precondition covering every loading rule.
pub struct LegalCrossing;

impl LegalCrossing {
    /// Validates all preconditions for a crossing.
    #[instrument(skip(rules, state))]
    pub fn check(
        rules: &Crossing,
        mov: &CrossingMove,
        state: &CrossingState,
    ) -> Result<(), MoveError> {
        BoatNotEmpty::check(mov)?;
        WithinCapacity::check(rules, mov)?;
        KnownPassengers::check(rules, mov)?;
        DistinctPassengers::check(mov)?;
        PassengersWithBoat::check(mov, state)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Landing Postconditions
// ─────────────────────────────────────────────────────────────

/// Postcondition: the safety predicate holds on both banks.
pub struct SafeBanks;

impl SafeBanks {
    /// Reports the first unsafe bank.
    pub fn check(rules: &Crossing, state: &CrossingState) -> Result<(), MoveError> {
        for bank in [Bank::Left, Bank::Right] {
            if !rules.safety().is_safe(state.bank(bank)) {
                return Err(MoveError::Unsafe {
                    bank,
                    rule: rules.safety().name().to_string(),
                });
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Crossing Contract
// ─────────────────────────────────────────────────────────────

/// Contract for crossings.
///
/// Preconditions:
/// - Between 1 and `k` distinct, known passengers
/// - Every passenger on the boat's bank
///
/// Postconditions:
/// - Both banks satisfy the safety predicate
/// - Every entity on exactly one bank, boat empty
pub struct MoveContract;

impl Contract<Crossing, CrossingState, CrossingMove> for MoveContract {
    type Error = MoveError;

    fn pre(rules: &Crossing, state: &CrossingState, action: &CrossingMove) -> Result<(), MoveError> {
        LegalCrossing::check(rules, action, state)
    }

    fn post(rules: &Crossing, _before: &CrossingState, after: &CrossingState) -> Result<(), MoveError> {
        SafeBanks::check(rules, after)?;
        CrossingInvariants::check_all(rules, after).map_err(|violations| {
            MoveError::InvariantViolation(format!(
                "Postcondition failed: {}",
                InvariantViolation::join(&violations)
            ))
        })
    }
}
