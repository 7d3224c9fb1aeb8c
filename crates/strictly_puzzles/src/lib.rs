//! Strictly Puzzles library - rule-enforcing puzzle simulators
//!
//! Ground-truth oracles for checking move sequences proposed by a language
//! model against the Tower of Hanoi and river-crossing puzzles.
//!
//! # Architecture
//!
//! - **Simulator**: facade dispatching to the disk or crossing rules engine
//! - **Session**: registry of simulators keyed by `env_id`, with idle eviction
//! - **Tools**: the tool-call contract, returning errors as data
//! - **Server**: MCP adapter over the tools (stdio or HTTP)
//!
//! # Example
//!
//! ```
//! use strictly_puzzles::{ExecuteMoveRequest, InitSimulatorRequest, SimulatorTools};
//!
//! let tools = SimulatorTools::default();
//! let created = tools
//!     .init_simulator(InitSimulatorRequest {
//!         puzzle_type: "TowerOfHanoi".to_string(),
//!         n: 1,
//!         k: None,
//!         scenario: None,
//!     })
//!     .unwrap();
//!
//! let moved = tools
//!     .execute_move(ExecuteMoveRequest {
//!         env_id: created.env_id,
//!         mov: serde_json::json!([1, 0, 2]),
//!     })
//!     .unwrap();
//! assert!(moved.goal_reached);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod error;
mod params;
mod server;
mod session;
mod simulator;
mod tools;

// Crate-level exports - Command line
pub use cli::{Cli, Command};

// Crate-level exports - Configuration
pub use config::{
    ConfigError, DEFAULT_MAX_PUZZLE_SIZE, DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TTL_SECS,
    SimulatorConfig,
};

// Crate-level exports - Errors
pub use error::{ErrorKind, SimulatorError};

// Crate-level exports - Parameters
pub use params::{DEFAULT_BOAT_CAPACITY, PuzzleParameters, PuzzleType};

// Crate-level exports - Server types
pub use server::PuzzleServer;

// Crate-level exports - Session management
pub use session::{EnvId, Session, SessionRegistry, SessionSummary};

// Crate-level exports - Simulator
pub use simulator::{Engine, MoveOutcome, PuzzleMove, PuzzleState, Simulator, StateSnapshot};

// Crate-level exports - Tool contract
pub use tools::{
    DEFAULT_RESET, DeleteSimulatorResponse, EnvRequest, ExecuteMoveRequest, ExecuteMoveResponse,
    ExecuteMovesRequest, ExecuteMovesResponse, GetStateResponse, InitSimulatorRequest,
    InitSimulatorResponse, ListSimulatorsResponse, MoveResult, ResetSimulatorRequest,
    ResetSimulatorResponse, SimulatorTools, ToolError, ToolResult,
};

// Puzzle crates
pub use strictly_crossing;
pub use strictly_hanoi;
