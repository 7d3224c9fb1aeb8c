//! Moves and the errors they can produce.
//!
//! A move names the disk it expects to lift. The engine rejects the move if
//! that disk is not actually on top of the source peg, so a caller's belief
//! about the position is checked along with the rules.

use super::types::DiskId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strictly_contracts::InvariantViolation;

/// A single disk transfer.
///
/// Deserializes from either `{"disk_id":1,"from_peg":0,"to_peg":2}` or the
/// positional triple `[1, 0, 2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct DiskMove {
    /// Disk being moved.
    pub disk_id: DiskId,
    /// Peg the disk is lifted from.
    pub from_peg: usize,
    /// Peg the disk is placed on.
    pub to_peg: usize,
}

impl DiskMove {
    /// Creates a new move.
    pub fn new(disk_id: DiskId, from_peg: usize, to_peg: usize) -> Self {
        Self {
            disk_id,
            from_peg,
            to_peg,
        }
    }
}

impl std::fmt::Display for DiskMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "disk {} from peg {} to peg {}",
            self.disk_id, self.from_peg, self.to_peg
        )
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The peg index is outside the board.
    #[display("Peg {} does not exist", _0)]
    NoSuchPeg(usize),

    /// Source and destination are the same peg.
    #[display("Disk must move to a different peg (both were {})", _0)]
    SamePeg(usize),

    /// The source peg holds no disks.
    #[display("Peg {} is empty", _0)]
    EmptyPeg(usize),

    /// The named disk is not the topmost disk on the source peg.
    #[display("Disk {} is not on top of peg {} (top is {})", disk, peg, top)]
    NotTopDisk {
        /// Disk the move named.
        disk: DiskId,
        /// Source peg.
        peg: usize,
        /// Disk actually on top.
        top: DiskId,
    },

    /// The destination's top disk is smaller than the moved disk.
    #[display("Disk {} cannot be placed on smaller disk {}", disk, onto)]
    LargerOntoSmaller {
        /// Disk being moved.
        disk: DiskId,
        /// Top disk of the destination peg.
        onto: DiskId,
    },

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

/// A position that does not satisfy the puzzle's invariants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invalid disk puzzle state: {}", InvariantViolation::join(violations))]
pub struct StateError {
    /// Every invariant the position broke.
    pub violations: Vec<InvariantViolation>,
}

impl std::error::Error for StateError {}
