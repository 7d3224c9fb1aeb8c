//! MCP server exposing the simulator tools.

use crate::session::SessionRegistry;
use crate::tools::{
    EnvRequest, ExecuteMoveRequest, ExecuteMovesRequest, InitSimulatorRequest,
    ResetSimulatorRequest, SimulatorTools, ToolResult,
};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

/// Serializes a tool outcome into a call result.
///
/// Puzzle errors become an error-flagged result carrying the JSON error body.
/// Only a serialization failure surfaces as a protocol error.
fn respond<T: Serialize>(result: ToolResult<T>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(body) => {
            let text = serde_json::to_string(&body).map_err(|e| {
                error!(error = %e, "Failed to serialize tool response");
                McpError::internal_error(format!("Failed to serialize response: {}", e), None)
            })?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(err) => {
            warn!(kind = %err.error, message = %err.message, "Tool call failed");
            let text = serde_json::to_string(&err).map_err(|e| {
                McpError::internal_error(format!("Failed to serialize error: {}", e), None)
            })?;
            Ok(CallToolResult::error(vec![Content::text(text)]))
        }
    }
}

/// Main server handler.
#[derive(Clone)]
pub struct PuzzleServer {
    tools: SimulatorTools,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PuzzleServer {
    /// Creates a server over shared tools.
    #[instrument(skip(tools))]
    pub fn with_tools(tools: SimulatorTools) -> Self {
        debug!("Creating puzzle server with shared registry");
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }

    /// Creates a server with its own registry.
    pub fn new(registry: SessionRegistry) -> Self {
        info!("Creating puzzle server");
        Self::with_tools(SimulatorTools::new(registry))
    }

    /// Tools backing this server.
    pub fn tools(&self) -> &SimulatorTools {
        &self.tools
    }

    /// Creates a simulator session.
    #[instrument(skip(self, req), fields(puzzle_type = %req.puzzle_type, n = req.n))]
    #[tool(
        description = "Create a puzzle simulator. puzzle_type is TowerOfHanoi or RiverCrossing; N is the number of disks or entities; k is the boat capacity (RiverCrossing only, default min(3, N)); scenario is actor_agent (default) or unrestricted. Returns env_id for later calls."
    )]
    pub async fn init_simulator(
        &self,
        Parameters(req): Parameters<InitSimulatorRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.init_simulator(req))
    }

    /// Executes one move.
    #[instrument(skip(self, req), fields(env_id = %req.env_id))]
    #[tool(
        description = "Execute one move. TowerOfHanoi: [disk_id, from_peg, to_peg] with pegs 0-2. RiverCrossing: array of entity ids to ferry across. Illegal moves return move_successful=false and leave the state unchanged."
    )]
    pub async fn execute_move(
        &self,
        Parameters(req): Parameters<ExecuteMoveRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.execute_move(req))
    }

    /// Executes a list of moves.
    #[instrument(skip(self, req), fields(env_id = %req.env_id, count = req.moves.len()))]
    #[tool(
        description = "Execute moves in order, stopping at the first illegal one. Returns per-move results, the final state and whether the goal was reached."
    )]
    pub async fn execute_moves(
        &self,
        Parameters(req): Parameters<ExecuteMovesRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.execute_moves(req))
    }

    /// Resets a simulator.
    #[instrument(skip(self, req), fields(env_id = %req.env_id))]
    #[tool(
        description = "Reset the simulator to its starting state, or to a supplied state which must satisfy the puzzle invariants. Omit state or pass \"default\" for the starting state."
    )]
    pub async fn reset_simulator(
        &self,
        Parameters(req): Parameters<ResetSimulatorRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.reset_simulator(req))
    }

    /// Reads simulator state.
    #[instrument(skip(self, req), fields(env_id = %req.env_id))]
    #[tool(description = "Get the puzzle type, parameters, current state and whether the goal is reached")]
    pub async fn get_state(
        &self,
        Parameters(req): Parameters<EnvRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.get_state(req))
    }

    /// Deletes a simulator.
    #[instrument(skip(self, req), fields(env_id = %req.env_id))]
    #[tool(description = "Delete a simulator session. Deleting an unknown session is not an error.")]
    pub async fn delete_simulator(
        &self,
        Parameters(req): Parameters<EnvRequest>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.delete_simulator(req))
    }

    /// Lists live simulators.
    #[instrument(skip(self))]
    #[tool(description = "List live simulator sessions with their idle time in seconds")]
    pub async fn list_simulators(&self) -> Result<CallToolResult, McpError> {
        respond(self.tools.list_simulators())
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for PuzzleServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "Rule-enforcing Tower of Hanoi and river-crossing simulators. Call init_simulator, then execute_move or execute_moves with the returned env_id. Sessions idle past the TTL are evicted.",
        )
    }
}
