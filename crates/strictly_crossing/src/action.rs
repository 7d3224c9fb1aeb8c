//! Crossing moves and the errors they can produce.

use super::types::{Bank, EntityId, EntityRef, deserialize_entities};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use strictly_contracts::InvariantViolation;

/// The group of entities that rides the boat across in one trip.
///
/// Serializes as a bare array of entity ids, e.g. `[1, 2]`. Also reads
/// actor/agent labels, so `["a_1", "A_1"]` is the same move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct CrossingMove {
    #[schemars(with = "Vec<EntityRef>")]
    passengers: Vec<EntityId>,
}

impl<'de> Deserialize<'de> for CrossingMove {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_entities(deserializer).map(Self::new)
    }
}

impl CrossingMove {
    /// Creates a move carrying `passengers`.
    pub fn new(passengers: Vec<EntityId>) -> Self {
        Self { passengers }
    }

    /// Entities in the boat for this trip.
    pub fn passengers(&self) -> &[EntityId] {
        &self.passengers
    }
}

impl std::fmt::Display for CrossingMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.passengers)
    }
}

/// Error that can occur when validating or applying a crossing.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The boat cannot cross empty.
    #[display("The boat cannot cross empty")]
    EmptyBoat,

    /// More passengers than the boat holds.
    #[display("{} passengers exceed boat capacity {}", count, capacity)]
    OverCapacity {
        /// Passengers requested.
        count: usize,
        /// Boat capacity.
        capacity: u32,
    },

    /// The id does not name an entity of this puzzle.
    #[display("Entity {} does not exist", _0)]
    UnknownEntity(EntityId),

    /// The same entity was listed twice.
    #[display("Entity {} is listed more than once", _0)]
    DuplicatePassenger(EntityId),

    /// A passenger is on the other bank from the boat.
    #[display("Entity {} is on the {} bank but the boat is on the {} bank", entity, side, boat)]
    NotWithBoat {
        /// Passenger.
        entity: EntityId,
        /// Bank the passenger is on.
        side: Bank,
        /// Bank the boat is on.
        boat: Bank,
    },

    /// The crossing would leave a forbidden group on a bank.
    #[display("Crossing would leave the {} bank unsafe under the {} rule", bank, rule)]
    Unsafe {
        /// Bank that would be unsafe.
        bank: Bank,
        /// Name of the broken safety predicate.
        rule: String,
    },

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

/// A position that does not satisfy the puzzle's invariants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invalid crossing puzzle state: {}", InvariantViolation::join(violations))]
pub struct StateError {
    /// Every invariant the position broke.
    pub violations: Vec<InvariantViolation>,
}

impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_move_accepts_ids_and_labels() {
        let by_label: CrossingMove = serde_json::from_value(json!(["a_1", "A_1"])).unwrap();
        assert_eq!(by_label, CrossingMove::new(vec![1, 2]));

        let mixed: CrossingMove = serde_json::from_value(json!([3, "A_2"])).unwrap();
        assert_eq!(mixed.passengers(), &[3, 4]);
    }

    #[test]
    fn test_move_rejects_unknown_label() {
        let err = serde_json::from_value::<CrossingMove>(json!(["b_1"])).unwrap_err();
        assert!(err.to_string().contains("b_1"));
    }

    #[test]
    fn test_move_serializes_as_ids() {
        let mov: CrossingMove = serde_json::from_value(json!(["A_3"])).unwrap();
        assert_eq!(serde_json::to_value(&mov).unwrap(), json!([6]));
    }
}
