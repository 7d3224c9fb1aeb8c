//! Core domain types for the river-crossing puzzle.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Identifier of an entity (actor, agent, or any other traveller).
pub type EntityId = u32;

/// An entity written either as its id or as an actor/agent label.
///
/// `a_i` is entity `2i-1` and `A_i` is entity `2i`, so `["a_1", "A_1"]`
/// and `[1, 2]` name the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EntityRef {
    /// Numeric id.
    Id(EntityId),
    /// Label such as `a_3` or `A_3`.
    Label(String),
}

impl EntityRef {
    /// Resolves the reference to an entity id.
    pub fn resolve(&self) -> Result<EntityId, String> {
        match self {
            EntityRef::Id(id) => Ok(*id),
            EntityRef::Label(label) => parse_label(label)
                .ok_or_else(|| format!("unknown entity label {:?}, expected a_i or A_i", label)),
        }
    }
}

/// Parses `a_i` (actor `i`) or `A_i` (agent `i`) with `i >= 1`.
pub fn parse_label(label: &str) -> Option<EntityId> {
    let (kind, index) = label.split_once('_')?;
    if !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: u32 = index.parse().ok().filter(|&i| i >= 1)?;
    let agent = index.checked_mul(2)?;
    match kind {
        "a" => Some(agent - 1),
        "A" => Some(agent),
        _ => None,
    }
}

/// Reads a list of entities given as ids or labels.
pub(crate) fn deserialize_entities<'de, D>(deserializer: D) -> Result<Vec<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<EntityRef>::deserialize(deserializer)?
        .iter()
        .map(|entity| entity.resolve().map_err(serde::de::Error::custom))
        .collect()
}

/// One side of the river.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Bank {
    /// Starting bank.
    Left,
    /// Destination bank.
    Right,
}

impl Bank {
    /// Returns the other bank.
    pub fn opposite(self) -> Self {
        match self {
            Bank::Left => Bank::Right,
            Bank::Right => Bank::Left,
        }
    }
}

/// Position of every entity and the boat.
///
/// Serializes as
/// `{"boat":"left","left":[1,2],"right":[],"boat_occupants":[]}`. Entity
/// lists produced by the engine are sorted. Entities may also be written as
/// labels (see [`EntityRef`]). Construction is unchecked so that externally
/// supplied positions can be represented before they are validated with
/// [`crate::Crossing::validate_state`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CrossingState {
    boat: Bank,
    #[serde(deserialize_with = "deserialize_entities")]
    #[schemars(with = "Vec<EntityId>")]
    left: Vec<EntityId>,
    #[serde(deserialize_with = "deserialize_entities")]
    #[schemars(with = "Vec<EntityId>")]
    right: Vec<EntityId>,
    #[serde(default, deserialize_with = "deserialize_entities")]
    #[schemars(with = "Vec<EntityId>")]
    boat_occupants: Vec<EntityId>,
}

impl CrossingState {
    /// Wraps the given position without validating it.
    pub fn new(
        boat: Bank,
        left: Vec<EntityId>,
        right: Vec<EntityId>,
        boat_occupants: Vec<EntityId>,
    ) -> Self {
        Self {
            boat,
            left,
            right,
            boat_occupants,
        }
    }

    /// Everyone on the left bank with the boat.
    pub fn initial(entities: u32) -> Self {
        Self::new(Bank::Left, (1..=entities).collect(), Vec::new(), Vec::new())
    }

    /// Side the boat is moored on.
    pub fn boat(&self) -> Bank {
        self.boat
    }

    /// Entities on the given bank.
    pub fn bank(&self, side: Bank) -> &[EntityId] {
        match side {
            Bank::Left => &self.left,
            Bank::Right => &self.right,
        }
    }

    /// Entities on the left bank.
    pub fn left(&self) -> &[EntityId] {
        &self.left
    }

    /// Entities on the right bank.
    pub fn right(&self) -> &[EntityId] {
        &self.right
    }

    /// Entities in the boat. Always empty for a position at rest.
    pub fn boat_occupants(&self) -> &[EntityId] {
        &self.boat_occupants
    }

    /// Bank the entity stands on, if it is on either.
    pub fn side_of(&self, entity: EntityId) -> Option<Bank> {
        if self.left.contains(&entity) {
            Some(Bank::Left)
        } else if self.right.contains(&entity) {
            Some(Bank::Right)
        } else {
            None
        }
    }

    /// Ferries the passengers across and moors the boat on the far side.
    ///
    /// The crossing completes in one step; the boat is empty afterwards.
    pub(crate) fn cross(&self, passengers: &[EntityId]) -> Self {
        let from = self.boat;
        let to = from.opposite();
        let riding: HashSet<EntityId> = passengers.iter().copied().collect();

        let mut departing: Vec<EntityId> = self
            .bank(from)
            .iter()
            .copied()
            .filter(|id| !riding.contains(id))
            .collect();
        let mut arriving: Vec<EntityId> = self
            .bank(to)
            .iter()
            .chain(passengers.iter())
            .copied()
            .collect();
        departing.sort_unstable();
        arriving.sort_unstable();

        let (left, right) = match from {
            Bank::Left => (departing, arriving),
            Bank::Right => (arriving, departing),
        };
        Self::new(to, left, right, Vec::new())
    }

    /// Same position with every entity list in ascending order.
    pub fn normalized(mut self) -> Self {
        self.left.sort_unstable();
        self.right.sort_unstable();
        self.boat_occupants.sort_unstable();
        self
    }

    /// Formats the position on one line, e.g. `[1 2] boat| []`.
    pub fn display(&self) -> String {
        self.display_with(|id| id.to_string())
    }

    /// Formats the position using `label` for each entity.
    pub fn display_with(&self, label: impl Fn(EntityId) -> String) -> String {
        let list = |ids: &[EntityId]| ids.iter().map(|&id| label(id)).collect::<Vec<_>>().join(" ");
        match self.boat {
            Bank::Left => format!("[{}] boat| [{}]", list(&self.left), list(&self.right)),
            Bank::Right => format!("[{}] |boat [{}]", list(&self.left), list(&self.right)),
        }
    }
}

impl std::fmt::Display for CrossingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
