//! Pure rules for the constrained river-crossing puzzle.
//!
//! Entities numbered `1..=N` start on the left bank with the boat. Each move
//! ferries between one and `k` of them to the opposite bank. Which groupings
//! may be left together on a bank is decided by a pluggable
//! [`SafetyPredicate`]; the classic actor/agent rule is the default
//! [`Scenario`].
//!
//! ```
//! use strictly_crossing::{Crossing, CrossingMove, Scenario};
//!
//! let crossing = Crossing::new(2, 2, Scenario::ActorAgent);
//! let done = crossing
//!     .apply(&crossing.initial_state(), &CrossingMove::new(vec![1, 2]))
//!     .unwrap();
//! assert!(crossing.is_goal(&done));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod invariants;
mod rules;
mod safety;
mod types;

pub use action::{CrossingMove, MoveError, StateError};
pub use contracts::{
    BoatNotEmpty, DistinctPassengers, KnownPassengers, LegalCrossing, MoveContract,
    PassengersWithBoat, SafeBanks, WithinCapacity,
};
pub use invariants::{BanksSafe, BoatAtRest, BoatWithinCapacity, CrossingInvariants, EveryEntityOnce};
pub use rules::Crossing;
pub use safety::{Chaperone, SafetyPredicate, Scenario, Unrestricted};
pub use strictly_contracts::{Contract, Invariant, InvariantSet, InvariantViolation};
pub use types::{Bank, CrossingState, EntityId, EntityRef, parse_label};
