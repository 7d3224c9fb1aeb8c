//! Puzzle parameters fixed when a session is created.

use crate::error::SimulatorError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strictly_crossing::Scenario;
use tracing::{debug, instrument};

/// Boat capacity used when the caller does not name one.
pub const DEFAULT_BOAT_CAPACITY: u32 = 3;

/// Puzzle families the simulator can host.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PuzzleType {
    /// Disk-relocation puzzle.
    #[strum(to_string = "TowerOfHanoi", serialize = "hanoi", serialize = "disk")]
    TowerOfHanoi,
    /// Constrained river-crossing puzzle.
    #[strum(
        to_string = "RiverCrossing",
        serialize = "crossing",
        serialize = "river_crossing"
    )]
    RiverCrossing,
}

/// Validated puzzle parameters.
///
/// `n` is the disk count for the disk puzzle and the entity count for the
/// crossing puzzle. `k` and `scenario` only apply to the crossing puzzle and
/// are always present for it once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PuzzleParameters {
    puzzle_type: PuzzleType,
    #[serde(rename = "N")]
    n: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scenario: Option<Scenario>,
}

impl PuzzleParameters {
    /// Parameters for a disk puzzle with `disks` disks.
    pub fn hanoi(disks: u32) -> Self {
        Self {
            puzzle_type: PuzzleType::TowerOfHanoi,
            n: disks,
            k: None,
            scenario: None,
        }
    }

    /// Parameters for a crossing puzzle.
    pub fn crossing(entities: u32, capacity: u32, scenario: Scenario) -> Self {
        Self {
            puzzle_type: PuzzleType::RiverCrossing,
            n: entities,
            k: Some(capacity),
            scenario: Some(scenario),
        }
    }

    /// Builds parameters from raw tool input and validates them.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::InvalidParameters`] if the puzzle type is unknown,
    /// `n` is not in `1..=max_size`, `k` is outside `[1, n]` for the crossing
    /// puzzle, or the scenario is unknown or unplayable with `n` entities.
    #[instrument]
    pub fn parse(
        puzzle_type: &str,
        n: i64,
        k: Option<i64>,
        scenario: Option<&str>,
        max_size: u32,
    ) -> Result<Self, SimulatorError> {
        let puzzle_type: PuzzleType = puzzle_type.trim().parse().map_err(|_| {
            SimulatorError::InvalidParameters(format!(
                "unknown puzzle type '{}', expected TowerOfHanoi or RiverCrossing",
                puzzle_type
            ))
        })?;

        if n < 1 {
            return Err(SimulatorError::InvalidParameters(format!(
                "N must be at least 1, got {}",
                n
            )));
        }
        let n = u32::try_from(n).map_err(|_| {
            SimulatorError::InvalidParameters(format!("N = {} is too large", n))
        })?;

        let params = match puzzle_type {
            PuzzleType::TowerOfHanoi => {
                if k.is_some() || scenario.is_some() {
                    debug!("Ignoring k and scenario for the disk puzzle");
                }
                Self::hanoi(n)
            }
            PuzzleType::RiverCrossing => {
                let k = match k {
                    Some(k) => u32::try_from(k).map_err(|_| {
                        SimulatorError::InvalidParameters(format!(
                            "k must be between 1 and N = {}, got {}",
                            n, k
                        ))
                    })?,
                    None => DEFAULT_BOAT_CAPACITY.min(n),
                };
                let scenario = match scenario {
                    Some(name) => name.trim().parse().map_err(|_| {
                        SimulatorError::InvalidParameters(format!(
                            "unknown scenario '{}', expected actor_agent or unrestricted",
                            name
                        ))
                    })?,
                    None => Scenario::default(),
                };
                Self::crossing(n, k, scenario)
            }
        };

        params.validate(max_size)?;
        Ok(params)
    }

    /// Checks the parameters' own invariants.
    pub fn validate(&self, max_size: u32) -> Result<(), SimulatorError> {
        if self.n < 1 || self.n > max_size {
            return Err(SimulatorError::InvalidParameters(format!(
                "N must be between 1 and {}, got {}",
                max_size, self.n
            )));
        }

        if self.puzzle_type == PuzzleType::RiverCrossing {
            let k = self.boat_capacity();
            if k < 1 || k > self.n {
                return Err(SimulatorError::InvalidParameters(format!(
                    "k must be between 1 and N = {}, got {}",
                    self.n, k
                )));
            }
            self.scenario()
                .supports(self.n)
                .map_err(SimulatorError::InvalidParameters)?;
        }

        Ok(())
    }

    /// Puzzle family.
    pub fn puzzle_type(&self) -> PuzzleType {
        self.puzzle_type
    }

    /// Disk or entity count.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Boat capacity as supplied, if any.
    pub fn k(&self) -> Option<u32> {
        self.k
    }

    /// Boat capacity, defaulted for parameters built without one.
    pub fn boat_capacity(&self) -> u32 {
        self.k.unwrap_or_else(|| DEFAULT_BOAT_CAPACITY.min(self.n))
    }

    /// Crossing scenario, defaulted for parameters built without one.
    pub fn scenario(&self) -> Scenario {
        self.scenario.unwrap_or_default()
    }
}
