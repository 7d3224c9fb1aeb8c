//! Simulator facade dispatching to the puzzle engine for a session.

use crate::error::SimulatorError;
use crate::params::{PuzzleParameters, PuzzleType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strictly_crossing::{Crossing, CrossingMove, CrossingState};
use strictly_hanoi::{DiskMove, Hanoi, HanoiState};
use tracing::{debug, error, info, instrument, warn};

/// Position of either puzzle.
///
/// Serializes as the bare position of the underlying puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PuzzleState {
    /// Disk puzzle pegs.
    Hanoi(HanoiState),
    /// Crossing puzzle banks and boat.
    Crossing(CrossingState),
}

impl PuzzleState {
    /// Canonical form: crossing bank lists sorted ascending.
    ///
    /// Peg stacks are ordered by position, so disk states are unchanged.
    pub fn normalized(self) -> Self {
        match self {
            PuzzleState::Hanoi(state) => PuzzleState::Hanoi(state),
            PuzzleState::Crossing(state) => PuzzleState::Crossing(state.normalized()),
        }
    }
}

impl std::fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PuzzleState::Hanoi(state) => write!(f, "{}", state),
            PuzzleState::Crossing(state) => write!(f, "{}", state),
        }
    }
}

/// Move for either puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PuzzleMove {
    /// Disk transfer.
    Disk(DiskMove),
    /// Boat trip.
    Crossing(CrossingMove),
}

impl std::fmt::Display for PuzzleMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PuzzleMove::Disk(mov) => write!(f, "{}", mov),
            PuzzleMove::Crossing(mov) => write!(f, "{}", mov),
        }
    }
}

/// Rules engine for one puzzle family.
#[derive(Debug, Clone)]
pub enum Engine {
    /// Disk-relocation rules.
    Hanoi(Hanoi),
    /// River-crossing rules.
    Crossing(Crossing),
}

impl Engine {
    /// Builds the engine described by `params`.
    pub fn from_parameters(params: &PuzzleParameters) -> Self {
        match params.puzzle_type() {
            PuzzleType::TowerOfHanoi => Engine::Hanoi(Hanoi::new(params.n())),
            PuzzleType::RiverCrossing => Engine::Crossing(Crossing::new(
                params.n(),
                params.boat_capacity(),
                params.scenario(),
            )),
        }
    }

    /// Starting position.
    pub fn initial_state(&self) -> PuzzleState {
        match self {
            Engine::Hanoi(rules) => PuzzleState::Hanoi(rules.initial_state()),
            Engine::Crossing(rules) => PuzzleState::Crossing(rules.initial_state()),
        }
    }

    /// Interprets a JSON move in this engine's move format.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::IllegalMove`] if the value is not a move of this puzzle.
    pub fn parse_move(&self, value: &Value) -> Result<PuzzleMove, SimulatorError> {
        let parsed = match self {
            Engine::Hanoi(_) => DiskMove::deserialize(value).map(PuzzleMove::Disk),
            Engine::Crossing(_) => CrossingMove::deserialize(value).map(PuzzleMove::Crossing),
        };
        parsed.map_err(|e| {
            SimulatorError::IllegalMove(format!("malformed move {}: {}", value, e))
        })
    }

    /// Interprets a JSON position in this engine's state format.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::InvalidResetState`] if the value is not a position of
    /// this puzzle. The position's invariants are not checked here.
    pub fn parse_state(&self, value: &Value) -> Result<PuzzleState, SimulatorError> {
        let parsed = match self {
            Engine::Hanoi(_) => HanoiState::deserialize(value).map(PuzzleState::Hanoi),
            Engine::Crossing(_) => CrossingState::deserialize(value).map(PuzzleState::Crossing),
        };
        parsed.map_err(|e| {
            SimulatorError::InvalidResetState(format!("malformed state {}: {}", value, e))
        })
    }

    /// Applies a move to a position, returning the new position.
    pub fn apply(
        &self,
        state: &PuzzleState,
        mov: &PuzzleMove,
    ) -> Result<PuzzleState, SimulatorError> {
        match (self, state, mov) {
            (Engine::Hanoi(rules), PuzzleState::Hanoi(state), PuzzleMove::Disk(mov)) => {
                Ok(PuzzleState::Hanoi(rules.apply(state, mov)?))
            }
            (Engine::Crossing(rules), PuzzleState::Crossing(state), PuzzleMove::Crossing(mov)) => {
                Ok(PuzzleState::Crossing(rules.apply(state, mov)?))
            }
            (_, _, mov) => Err(SimulatorError::IllegalMove(format!(
                "move {} does not belong to this puzzle",
                mov
            ))),
        }
    }

    /// Formats a position for logs, using entity labels where the puzzle has them.
    pub fn render(&self, state: &PuzzleState) -> String {
        match (self, state) {
            (Engine::Crossing(rules), PuzzleState::Crossing(state)) => rules.render(state),
            (_, state) => state.to_string(),
        }
    }

    /// True when the position is solved.
    pub fn is_goal(&self, state: &PuzzleState) -> bool {
        match (self, state) {
            (Engine::Hanoi(rules), PuzzleState::Hanoi(state)) => rules.is_goal(state),
            (Engine::Crossing(rules), PuzzleState::Crossing(state)) => rules.is_goal(state),
            _ => false,
        }
    }

    /// Checks a position against every invariant of this puzzle.
    pub fn validate(&self, state: &PuzzleState) -> Result<(), SimulatorError> {
        match (self, state) {
            (Engine::Hanoi(rules), PuzzleState::Hanoi(state)) => Ok(rules.validate_state(state)?),
            (Engine::Crossing(rules), PuzzleState::Crossing(state)) => {
                Ok(rules.validate_state(state)?)
            }
            _ => Err(SimulatorError::InvalidResetState(
                "state does not belong to this puzzle".to_string(),
            )),
        }
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// Always true; rejected moves are reported as errors.
    pub success: bool,
    /// Position after the move.
    pub state: PuzzleState,
    /// Whether the position is solved.
    pub goal_reached: bool,
}

/// Read-only view of a simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    /// Parameters the session was created with.
    pub parameters: PuzzleParameters,
    /// Current position.
    pub state: PuzzleState,
    /// Whether the position is solved.
    pub goal_reached: bool,
}

/// One puzzle instance: its rules, starting position and current position.
///
/// The current position only changes through [`Simulator::apply_move`] and
/// [`Simulator::reset`], both of which validate before committing.
#[derive(Debug, Clone)]
pub struct Simulator {
    parameters: PuzzleParameters,
    engine: Engine,
    initial: PuzzleState,
    current: PuzzleState,
}

impl Simulator {
    /// Creates a simulator at the starting position.
    #[instrument]
    pub fn new(parameters: PuzzleParameters) -> Self {
        let engine = Engine::from_parameters(&parameters);
        let initial = engine.initial_state();
        info!(puzzle = %parameters.puzzle_type(), n = parameters.n(), "Created simulator");
        Self {
            parameters,
            engine,
            current: initial.clone(),
            initial,
        }
    }

    /// Parameters the simulator was created with.
    pub fn parameters(&self) -> &PuzzleParameters {
        &self.parameters
    }

    /// Rules engine in use.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Current position.
    pub fn state(&self) -> &PuzzleState {
        &self.current
    }

    /// Position the simulator started from.
    pub fn initial_state(&self) -> &PuzzleState {
        &self.initial
    }

    /// Whether the current position is solved.
    pub fn is_goal(&self) -> bool {
        self.engine.is_goal(&self.current)
    }

    /// Validates and applies a move.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::IllegalMove`] if the move is rejected, in which case
    /// the current position is unchanged.
    #[instrument(skip(self), fields(puzzle = %self.parameters.puzzle_type()))]
    pub fn apply_move(&mut self, mov: &PuzzleMove) -> Result<MoveOutcome, SimulatorError> {
        let next = self.engine.apply(&self.current, mov).inspect_err(|e| {
            if e.is_fatal() {
                error!(error = %e, "Move produced a corrupt position");
            } else {
                debug!(error = %e, "Move rejected");
            }
        })?;

        self.current = next;
        let goal_reached = self.is_goal();
        debug!(state = %self.engine.render(&self.current), goal_reached, "Move applied");

        Ok(MoveOutcome {
            success: true,
            state: self.current.clone(),
            goal_reached,
        })
    }

    /// Parses and applies a move given as JSON.
    pub fn apply_json_move(&mut self, mov: &Value) -> Result<MoveOutcome, SimulatorError> {
        let mov = self.engine.parse_move(mov)?;
        self.apply_move(&mov)
    }

    /// Restores the starting position, or installs `state` after validating it.
    ///
    /// A supplied state is stored in canonical order, so bank lists read back
    /// sorted however they were given.
    ///
    /// # Errors
    ///
    /// [`SimulatorError::InvalidResetState`] if `state` breaks an invariant;
    /// the current position is left untouched.
    #[instrument(skip(self, state), fields(puzzle = %self.parameters.puzzle_type(), custom = state.is_some()))]
    pub fn reset(&mut self, state: Option<PuzzleState>) -> Result<&PuzzleState, SimulatorError> {
        match state {
            None => {
                self.current = self.initial.clone();
                debug!("Reset to starting position");
            }
            Some(state) => {
                self.engine.validate(&state).inspect_err(|e| {
                    warn!(error = %e, "Rejected reset state");
                })?;
                self.current = state.normalized();
                debug!(state = %self.engine.render(&self.current), "Reset to supplied position");
            }
        }
        Ok(&self.current)
    }

    /// Parses `state` in this puzzle's format and resets to it.
    pub fn reset_json(&mut self, state: Option<&Value>) -> Result<&PuzzleState, SimulatorError> {
        let state = state.map(|v| self.engine.parse_state(v)).transpose()?;
        self.reset(state)
    }

    /// Snapshot of parameters, position and goal flag.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            parameters: self.parameters,
            state: self.current.clone(),
            goal_reached: self.is_goal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strictly_crossing::Scenario;

    #[test]
    fn test_dispatches_to_hanoi() {
        let mut sim = Simulator::new(PuzzleParameters::hanoi(3));
        let outcome = sim.apply_json_move(&json!([1, 0, 2])).unwrap();
        assert!(outcome.success);
        assert_eq!(serde_json::to_value(&outcome.state).unwrap(), json!([[3, 2], [], [1]]));
    }

    #[test]
    fn test_dispatches_to_crossing() {
        let mut sim = Simulator::new(PuzzleParameters::crossing(2, 2, Scenario::ActorAgent));
        let outcome = sim.apply_json_move(&json!([1, 2])).unwrap();
        assert!(outcome.goal_reached);
    }

    #[test]
    fn test_mismatched_move_is_illegal() {
        let sim = Simulator::new(PuzzleParameters::hanoi(2));
        let crossing_move = PuzzleMove::Crossing(CrossingMove::new(vec![1]));
        let err = sim.engine().apply(sim.state(), &crossing_move).unwrap_err();
        assert!(matches!(err, SimulatorError::IllegalMove(_)));
    }

    #[test]
    fn test_malformed_json_move_is_illegal() {
        let mut sim = Simulator::new(PuzzleParameters::hanoi(2));
        let err = sim.apply_json_move(&json!({"disk": "big"})).unwrap_err();
        assert!(matches!(err, SimulatorError::IllegalMove(_)));
        assert_eq!(sim.state(), sim.initial_state());
    }

    #[test]
    fn test_reset_rejects_and_keeps_position() {
        let mut sim = Simulator::new(PuzzleParameters::hanoi(2));
        sim.apply_json_move(&json!([1, 0, 1])).unwrap();
        let before = sim.state().clone();

        let err = sim.reset_json(Some(&json!([[1, 2], [], []]))).unwrap_err();
        assert!(matches!(err, SimulatorError::InvalidResetState(_)));
        assert_eq!(sim.state(), &before);

        let err = sim.reset_json(Some(&json!({"boat": "left"}))).unwrap_err();
        assert!(matches!(err, SimulatorError::InvalidResetState(_)));
        assert_eq!(sim.state(), &before);
    }

    #[test]
    fn test_reset_stores_sorted_banks() {
        let mut sim = Simulator::new(PuzzleParameters::crossing(4, 2, Scenario::Unrestricted));
        let state = sim
            .reset_json(Some(&json!({"boat": "right", "left": [4, 2], "right": [3, 1]})))
            .unwrap();
        assert_eq!(
            serde_json::to_value(state).unwrap(),
            json!({"boat": "right", "left": [2, 4], "right": [1, 3], "boat_occupants": []})
        );
    }

    #[test]
    fn test_render_labels_crossing_entities() {
        let sim = Simulator::new(PuzzleParameters::crossing(2, 2, Scenario::ActorAgent));
        assert_eq!(sim.engine().render(sim.state()), "[a_1 A_1] boat| []");

        let disks = Simulator::new(PuzzleParameters::hanoi(2));
        assert_eq!(disks.engine().render(disks.state()), disks.state().to_string());
    }

    #[test]
    fn test_labelled_json_move() {
        let mut sim = Simulator::new(PuzzleParameters::crossing(2, 2, Scenario::ActorAgent));
        let outcome = sim.apply_json_move(&json!(["a_1", "A_1"])).unwrap();
        assert!(outcome.goal_reached);
    }
}
