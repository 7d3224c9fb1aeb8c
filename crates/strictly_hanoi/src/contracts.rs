//! Contract-based validation for disk moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! a move is applied only if every precondition holds, and the resulting
//! position must still satisfy every invariant.

use super::action::{DiskMove, MoveError};
use super::invariants::HanoiInvariants;
use super::rules::Hanoi;
use super::types::{HanoiState, PEG_COUNT};
use strictly_contracts::{Contract, InvariantSet, InvariantViolation};
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: both pegs exist.
pub struct PegsExist;

impl PegsExist {
    /// Rejects peg indices outside the board.
    pub fn check(mov: &DiskMove) -> Result<(), MoveError> {
        for peg in [mov.from_peg, mov.to_peg] {
            if peg >= PEG_COUNT {
                return Err(MoveError::NoSuchPeg(peg));
            }
        }
        Ok(())
    }
}

/// Precondition: the disk moves to a different peg.
pub struct DistinctPegs;

impl DistinctPegs {
    /// Rejects moves whose source and destination coincide.
    pub fn check(mov: &DiskMove) -> Result<(), MoveError> {
        if mov.from_peg == mov.to_peg {
            Err(MoveError::SamePeg(mov.from_peg))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the named disk is the topmost disk of the source peg.
pub struct TopDiskMatches;

impl TopDiskMatches {
    /// Rejects moves from an empty peg or naming a buried disk.
    pub fn check(mov: &DiskMove, state: &HanoiState) -> Result<(), MoveError> {
        match state.top(mov.from_peg) {
            None => Err(MoveError::EmptyPeg(mov.from_peg)),
            Some(top) if top != mov.disk_id => Err(MoveError::NotTopDisk {
                disk: mov.disk_id,
                peg: mov.from_peg,
                top,
            }),
            Some(_) => Ok(()),
        }
    }
}

/// Precondition: the destination is empty or topped by a larger disk.
pub struct SmallerOntoLarger;

impl SmallerOntoLarger {
    /// Rejects placing a disk on a smaller one.
    pub fn check(mov: &DiskMove, state: &HanoiState) -> Result<(), MoveError> {
        match state.top(mov.to_peg) {
            Some(onto) if onto <= mov.disk_id => Err(MoveError::LargerOntoSmaller {
                disk: mov.disk_id,
                onto,
            }),
            _ => Ok(()),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Composite Precondition
// ─────────────────────────────────────────────────────────────

/// Composite precondition covering every disk-move rule.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(state))]
    pub fn check(mov: &DiskMove, state: &HanoiState) -> Result<(), MoveError> {
        PegsExist::check(mov)?;
        DistinctPegs::check(mov)?;
        TopDiskMatches::check(mov, state)?;
        SmallerOntoLarger::check(mov, state)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract
// ─────────────────────────────────────────────────────────────

/// Contract for disk moves.
///
/// Preconditions:
/// - Both pegs exist and differ
/// - The named disk is on top of the source peg
/// - The destination is empty or topped by a larger disk
///
/// Postconditions:
/// - Three pegs, each strictly decreasing
/// - Every disk still present exactly once
pub struct MoveContract;

impl Contract<Hanoi, HanoiState, DiskMove> for MoveContract {
    type Error = MoveError;

    fn pre(_rules: &Hanoi, state: &HanoiState, action: &DiskMove) -> Result<(), MoveError> {
        LegalMove::check(action, state)
    }

    fn post(rules: &Hanoi, _before: &HanoiState, after: &HanoiState) -> Result<(), MoveError> {
        HanoiInvariants::check_all(rules, after).map_err(|violations| {
            MoveError::InvariantViolation(format!(
                "Postcondition failed: {}",
                InvariantViolation::join(&violations)
            ))
        })
    }
}
