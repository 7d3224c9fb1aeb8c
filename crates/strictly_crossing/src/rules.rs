//! Game logic and rules for the river-crossing puzzle.

use super::action::{CrossingMove, MoveError, StateError};
use super::contracts::MoveContract;
use super::invariants::CrossingInvariants;
use super::safety::{SafetyPredicate, Scenario};
use super::types::{Bank, CrossingState, EntityId};
use std::sync::Arc;
use strictly_contracts::{Contract, InvariantSet};
use tracing::{debug, instrument};

/// River-crossing puzzle engine.
///
/// Holds the entity count, the boat capacity and the safety predicate.
/// Positions are passed in and returned, so a rejected crossing leaves the
/// caller's position exactly as it was.
#[derive(Debug, Clone)]
pub struct Crossing {
    entities: u32,
    capacity: u32,
    safety: Arc<dyn SafetyPredicate>,
    scenario: Option<Scenario>,
}

impl Crossing {
    /// Creates an engine using one of the built-in scenarios.
    pub fn new(entities: u32, capacity: u32, scenario: Scenario) -> Self {
        Self {
            scenario: Some(scenario),
            ..Self::with_predicate(entities, capacity, scenario.predicate(entities))
        }
    }

    /// Creates an engine with a custom safety predicate.
    pub fn with_predicate(entities: u32, capacity: u32, safety: Arc<dyn SafetyPredicate>) -> Self {
        Self {
            entities,
            capacity,
            safety,
            scenario: None,
        }
    }

    /// Number of entities.
    pub fn entities(&self) -> u32 {
        self.entities
    }

    /// Boat capacity `k`.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// The safety predicate in force.
    pub fn safety(&self) -> &dyn SafetyPredicate {
        self.safety.as_ref()
    }

    /// Built-in scenario, if the engine was created from one.
    pub fn scenario(&self) -> Option<Scenario> {
        self.scenario
    }

    /// Display label of an entity under this engine's scenario.
    pub fn label(&self, entity: EntityId) -> String {
        match self.scenario {
            Some(scenario) => scenario.label(entity),
            None => entity.to_string(),
        }
    }

    /// Formats a position with scenario labels, e.g. `[a_1 A_1] boat| []`.
    pub fn render(&self, state: &CrossingState) -> String {
        state.display_with(|entity| self.label(entity))
    }

    /// Starting position: everyone and the boat on the left bank.
    pub fn initial_state(&self) -> CrossingState {
        CrossingState::initial(self.entities)
    }

    /// Checks the loading rules without applying the crossing.
    ///
    /// The safety rule is not consulted; see [`Crossing::apply`].
    pub fn check_move(&self, state: &CrossingState, mov: &CrossingMove) -> Result<(), MoveError> {
        MoveContract::pre(self, state, mov)
    }

    /// Returns true if the crossing may be applied to `state`.
    pub fn is_legal(&self, state: &CrossingState, mov: &CrossingMove) -> bool {
        self.apply(state, mov).is_ok()
    }

    /// Performs a complete crossing, returning the new position.
    ///
    /// The trip is all-or-nothing: if the landed position would break the
    /// safety predicate on either bank, the move is rejected.
    ///
    /// # Errors
    ///
    /// Returns the first broken loading rule, [`MoveError::Unsafe`], or
    /// [`MoveError::InvariantViolation`] if the result is somehow corrupt.
    #[instrument(skip(self, state), fields(entities = self.entities, capacity = self.capacity))]
    pub fn apply(&self, state: &CrossingState, mov: &CrossingMove) -> Result<CrossingState, MoveError> {
        MoveContract::pre(self, state, mov).inspect_err(|e| {
            debug!(error = %e, "Rejected crossing");
        })?;

        let next = state.cross(mov.passengers());

        MoveContract::post(self, state, &next).inspect_err(|e| {
            debug!(error = %e, "Crossing would land in an unsafe position");
        })?;

        Ok(next)
    }

    /// True when everyone and the boat are on the right bank.
    pub fn is_goal(&self, state: &CrossingState) -> bool {
        state.boat() == Bank::Right
            && state.left().is_empty()
            && state.right().len() == self.entities as usize
    }

    /// Checks an arbitrary position against every invariant.
    pub fn validate_state(&self, state: &CrossingState) -> Result<(), StateError> {
        CrossingInvariants::check_all(self, state).map_err(|violations| StateError { violations })
    }
}
