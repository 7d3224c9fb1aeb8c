//! Tool-call contract over the session registry.
//!
//! Each tool takes a plain request and returns either its typed response or a
//! [`ToolError`]. Both sides serialize to JSON, so the transport adapter never
//! has to turn a puzzle failure into a protocol error.

use crate::error::{ErrorKind, SimulatorError};
use crate::params::{PuzzleParameters, PuzzleType};
use crate::session::{EnvId, SessionRegistry, SessionSummary};
use crate::simulator::PuzzleState;
use derive_new::new;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Reset argument that means "back to the starting position".
pub const DEFAULT_RESET: &str = "default";

/// Request for creating a simulator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InitSimulatorRequest {
    /// Puzzle family: TowerOfHanoi or RiverCrossing.
    pub puzzle_type: String,
    /// Number of disks, or number of entities for the crossing puzzle.
    #[serde(rename = "N")]
    pub n: i64,
    /// Boat capacity for the crossing puzzle. Defaults to min(3, N).
    #[serde(default)]
    pub k: Option<i64>,
    /// Crossing safety rule: actor_agent (default) or unrestricted.
    #[serde(default)]
    pub scenario: Option<String>,
}

/// Response to a successful `init_simulator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InitSimulatorResponse {
    /// Identifier for subsequent calls.
    pub env_id: EnvId,
    /// Puzzle family created.
    pub puzzle_type: PuzzleType,
    /// Validated parameters.
    pub parameters: PuzzleParameters,
}

/// Request naming a single session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnvRequest {
    /// Session identifier from `init_simulator`.
    pub env_id: EnvId,
}

/// Request for executing one move.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteMoveRequest {
    /// Session identifier.
    pub env_id: EnvId,
    /// Disk move `[disk_id, from_peg, to_peg]` or crossing move `[ids...]`.
    #[serde(rename = "move")]
    pub mov: Value,
}

/// Response to `execute_move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteMoveResponse {
    /// Whether the move was legal and applied.
    pub move_successful: bool,
    /// Position after the call; unchanged when the move was rejected.
    pub state: PuzzleState,
    /// Whether the position is solved.
    pub goal_reached: bool,
    /// Why the move was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Request for executing a sequence of moves.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteMovesRequest {
    /// Session identifier.
    pub env_id: EnvId,
    /// Moves to apply in order.
    pub moves: Vec<Value>,
}

/// Outcome of one move in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// Position of the move in the batch.
    pub move_index: usize,
    /// The move as submitted.
    #[serde(rename = "move")]
    pub mov: Value,
    /// Whether the move was applied.
    pub successful: bool,
    /// Why the move was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response to `execute_moves`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteMovesResponse {
    /// Results for every move attempted, ending at the first rejection.
    pub move_results: Vec<MoveResult>,
    /// Position after the batch.
    pub final_state: PuzzleState,
    /// Whether the final position is solved.
    pub goal_reached: bool,
    /// True when every submitted move was applied.
    pub all_moves_successful: bool,
}

/// Request for resetting a session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResetSimulatorRequest {
    /// Session identifier.
    pub env_id: EnvId,
    /// Position to install, or omitted / "default" for the starting position.
    #[serde(default)]
    pub state: Option<Value>,
}

/// Response to `reset_simulator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSimulatorResponse {
    /// Always true; rejected states are reported as errors.
    pub reset_successful: bool,
    /// Position after the reset.
    pub current_state: PuzzleState,
}

/// Response to `get_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStateResponse {
    /// Puzzle family.
    pub puzzle_type: PuzzleType,
    /// Parameters the session was created with.
    pub parameters: PuzzleParameters,
    /// Current position.
    pub state: PuzzleState,
    /// Whether the position is solved.
    pub goal_reached: bool,
}

/// Response to `delete_simulator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSimulatorResponse {
    /// Session identifier.
    pub env_id: EnvId,
    /// False if the session was already gone.
    pub deleted: bool,
}

/// Response to `list_simulators`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSimulatorsResponse {
    /// Live sessions.
    pub sessions: Vec<SessionSummary>,
}

/// Structured error body returned in place of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, new)]
pub struct ToolError {
    /// Error category.
    pub error: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl From<SimulatorError> for ToolError {
    fn from(err: SimulatorError) -> Self {
        if err.is_fatal() {
            error!(error = %err, "Internal invariant violation");
        }
        ToolError::new(err.kind(), err.to_string())
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool call.
pub type ToolResult<T> = Result<T, ToolError>;

/// Tool implementations backed by a shared registry.
#[derive(Debug, Clone, Default, new)]
pub struct SimulatorTools {
    registry: SessionRegistry,
}

impl SimulatorTools {
    /// Registry the tools operate on.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Creates a simulator and returns its identifier.
    #[instrument(skip(self, req), fields(puzzle_type = %req.puzzle_type, n = req.n))]
    pub fn init_simulator(&self, req: InitSimulatorRequest) -> ToolResult<InitSimulatorResponse> {
        let parameters = PuzzleParameters::parse(
            &req.puzzle_type,
            req.n,
            req.k,
            req.scenario.as_deref(),
            self.registry.max_puzzle_size(),
        )
        .inspect_err(|e| warn!(error = %e, "Rejected simulator parameters"))?;

        let env_id = self.registry.create(parameters)?;
        info!(env_id = %env_id, "Simulator initialized");

        Ok(InitSimulatorResponse {
            env_id,
            puzzle_type: parameters.puzzle_type(),
            parameters,
        })
    }

    /// Executes one move. An illegal move is reported with
    /// `move_successful = false` and leaves the position unchanged.
    #[instrument(skip(self, req), fields(env_id = %req.env_id))]
    pub fn execute_move(&self, req: ExecuteMoveRequest) -> ToolResult<ExecuteMoveResponse> {
        let response = self.registry.with_session(&req.env_id, |session| {
            let simulator = session.simulator_mut();
            match simulator.apply_json_move(&req.mov) {
                Ok(outcome) => Ok(ExecuteMoveResponse {
                    move_successful: outcome.success,
                    state: outcome.state,
                    goal_reached: outcome.goal_reached,
                    reason: None,
                }),
                Err(SimulatorError::IllegalMove(reason)) => Ok(ExecuteMoveResponse {
                    move_successful: false,
                    state: simulator.state().clone(),
                    goal_reached: simulator.is_goal(),
                    reason: Some(reason),
                }),
                Err(e) => Err(e),
            }
        })??;

        debug!(
            move_successful = response.move_successful,
            goal_reached = response.goal_reached,
            "Move executed"
        );
        Ok(response)
    }

    /// Executes moves in order, stopping at the first rejected one.
    #[instrument(skip(self, req), fields(env_id = %req.env_id, count = req.moves.len()))]
    pub fn execute_moves(&self, req: ExecuteMovesRequest) -> ToolResult<ExecuteMovesResponse> {
        let response = self.registry.with_session(&req.env_id, |session| {
            let simulator = session.simulator_mut();
            let mut move_results = Vec::with_capacity(req.moves.len());
            let mut all_moves_successful = true;

            for (move_index, mov) in req.moves.iter().enumerate() {
                match simulator.apply_json_move(mov) {
                    Ok(_) => move_results.push(MoveResult {
                        move_index,
                        mov: mov.clone(),
                        successful: true,
                        reason: None,
                    }),
                    Err(SimulatorError::IllegalMove(reason)) => {
                        debug!(move_index, reason = %reason, "Batch stopped at rejected move");
                        move_results.push(MoveResult {
                            move_index,
                            mov: mov.clone(),
                            successful: false,
                            reason: Some(reason),
                        });
                        all_moves_successful = false;
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }

            Ok(ExecuteMovesResponse {
                move_results,
                final_state: simulator.state().clone(),
                goal_reached: simulator.is_goal(),
                all_moves_successful,
            })
        })??;

        info!(
            applied = response.move_results.iter().filter(|r| r.successful).count(),
            all_moves_successful = response.all_moves_successful,
            goal_reached = response.goal_reached,
            "Batch executed"
        );
        Ok(response)
    }

    /// Resets to the starting position or to a supplied, validated position.
    #[instrument(skip(self, req), fields(env_id = %req.env_id))]
    pub fn reset_simulator(&self, req: ResetSimulatorRequest) -> ToolResult<ResetSimulatorResponse> {
        let state = match req.state {
            Some(Value::String(ref s)) if s.eq_ignore_ascii_case(DEFAULT_RESET) => None,
            Some(Value::Null) => None,
            other => other,
        };

        let current_state = self.registry.with_session(&req.env_id, |session| {
            session
                .simulator_mut()
                .reset_json(state.as_ref())
                .cloned()
        })??;

        Ok(ResetSimulatorResponse {
            reset_successful: true,
            current_state,
        })
    }

    /// Reads the current position.
    #[instrument(skip(self, req), fields(env_id = %req.env_id))]
    pub fn get_state(&self, req: EnvRequest) -> ToolResult<GetStateResponse> {
        let snapshot = self
            .registry
            .with_session(&req.env_id, |session| session.simulator().snapshot())?;

        Ok(GetStateResponse {
            puzzle_type: snapshot.parameters.puzzle_type(),
            parameters: snapshot.parameters,
            state: snapshot.state,
            goal_reached: snapshot.goal_reached,
        })
    }

    /// Deletes a session. Deleting an unknown session is not an error.
    #[instrument(skip(self, req), fields(env_id = %req.env_id))]
    pub fn delete_simulator(&self, req: EnvRequest) -> ToolResult<DeleteSimulatorResponse> {
        let deleted = self.registry.delete(&req.env_id);
        Ok(DeleteSimulatorResponse {
            env_id: req.env_id,
            deleted,
        })
    }

    /// Lists live sessions.
    #[instrument(skip(self))]
    pub fn list_simulators(&self) -> ToolResult<ListSimulatorsResponse> {
        Ok(ListSimulatorsResponse {
            sessions: self.registry.list(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init(tools: &SimulatorTools, puzzle_type: &str, n: i64, k: Option<i64>) -> EnvId {
        tools
            .init_simulator(InitSimulatorRequest {
                puzzle_type: puzzle_type.to_string(),
                n,
                k,
                scenario: None,
            })
            .unwrap()
            .env_id
    }

    #[test]
    fn test_illegal_move_is_reported_as_data() {
        let tools = SimulatorTools::default();
        let env_id = init(&tools, "TowerOfHanoi", 3, None);

        let response = tools
            .execute_move(ExecuteMoveRequest {
                env_id: env_id.clone(),
                mov: json!([3, 0, 1]),
            })
            .unwrap();

        assert!(!response.move_successful);
        assert!(response.reason.is_some());
        assert_eq!(serde_json::to_value(&response.state).unwrap(), json!([[3, 2, 1], [], []]));
    }

    #[test]
    fn test_reset_accepts_default_keyword() {
        let tools = SimulatorTools::default();
        let env_id = init(&tools, "hanoi", 2, None);
        tools
            .execute_move(ExecuteMoveRequest {
                env_id: env_id.clone(),
                mov: json!({"disk_id": 1, "from_peg": 0, "to_peg": 1}),
            })
            .unwrap();

        let response = tools
            .reset_simulator(ResetSimulatorRequest {
                env_id,
                state: Some(json!("default")),
            })
            .unwrap();
        assert!(response.reset_successful);
        assert_eq!(serde_json::to_value(&response.current_state).unwrap(), json!([[2, 1], [], []]));
    }

    #[test]
    fn test_invalid_parameters_error_body() {
        let tools = SimulatorTools::default();
        let err = tools
            .init_simulator(InitSimulatorRequest {
                puzzle_type: "RiverCrossing".to_string(),
                n: 4,
                k: Some(5),
                scenario: None,
            })
            .unwrap_err();

        assert_eq!(err.error, ErrorKind::InvalidParameters);
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["error"], json!("InvalidParameters"));
        assert!(tools.registry().is_empty());
    }
}
