//! Safety predicates deciding which groups may be left together on a bank.

use super::types::EntityId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Rule over the set of entities on one bank.
///
/// Predicates are only consulted for positions at rest, i.e. after a
/// crossing has completed.
pub trait SafetyPredicate: std::fmt::Debug + Send + Sync {
    /// Returns false if the co-located entities form a forbidden group.
    fn is_safe(&self, bank: &[EntityId]) -> bool;

    /// Short name used in error messages.
    fn name(&self) -> &str;
}

/// Any grouping is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unrestricted;

impl SafetyPredicate for Unrestricted {
    fn is_safe(&self, _bank: &[EntityId]) -> bool {
        true
    }

    fn name(&self) -> &str {
        "unrestricted"
    }
}

/// Ward/guardian pairs.
///
/// A ward may not share a bank with another pair's guardian unless its own
/// guardian is also present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chaperone {
    pairs: Vec<(EntityId, EntityId)>,
}

impl Chaperone {
    /// Creates a rule from `(ward, guardian)` pairs.
    pub fn new(pairs: Vec<(EntityId, EntityId)>) -> Self {
        Self { pairs }
    }

    /// Actor/agent pairing: entity `2i-1` is actor `a_i`, entity `2i` is
    /// its agent `A_i`.
    pub fn actor_agent(entities: u32) -> Self {
        Self::new((1..=entities / 2).map(|i| (2 * i - 1, 2 * i)).collect())
    }

    /// Returns the `(ward, guardian)` pairs.
    pub fn pairs(&self) -> &[(EntityId, EntityId)] {
        &self.pairs
    }
}

impl SafetyPredicate for Chaperone {
    fn is_safe(&self, bank: &[EntityId]) -> bool {
        let present: HashSet<EntityId> = bank.iter().copied().collect();
        // With no guardian on the bank nobody is threatened.
        if !self.pairs.iter().any(|(_, guardian)| present.contains(guardian)) {
            return true;
        }
        self.pairs
            .iter()
            .all(|(ward, guardian)| !present.contains(ward) || present.contains(guardian))
    }

    fn name(&self) -> &str {
        "chaperone"
    }
}

/// Built-in puzzle scenarios selectable when a session is created.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Scenario {
    /// Actors may not be left with a rival agent unless their own agent is present.
    #[default]
    ActorAgent,
    /// No grouping restrictions; only capacity and boat position apply.
    Unrestricted,
}

impl Scenario {
    /// Builds the predicate for a puzzle with `entities` entities.
    pub fn predicate(self, entities: u32) -> Arc<dyn SafetyPredicate> {
        match self {
            Scenario::ActorAgent => Arc::new(Chaperone::actor_agent(entities)),
            Scenario::Unrestricted => Arc::new(Unrestricted),
        }
    }

    /// Checks that the scenario can be played with `entities` entities.
    pub fn supports(self, entities: u32) -> Result<(), String> {
        match self {
            Scenario::ActorAgent if entities % 2 != 0 => Err(format!(
                "actor_agent scenario needs an even number of entities (actor/agent pairs), got {}",
                entities
            )),
            _ => Ok(()),
        }
    }

    /// Display label for an entity, e.g. `a_1` or `A_1` for actor/agent.
    ///
    /// Scenarios without named roles use the bare id.
    pub fn label(self, entity: EntityId) -> String {
        match self {
            Scenario::ActorAgent if entity % 2 == 1 => format!("a_{}", entity.div_ceil(2)),
            Scenario::ActorAgent => format!("A_{}", entity / 2),
            Scenario::Unrestricted => entity.to_string(),
        }
    }
}
