//! Game logic and rules for the disk-relocation puzzle.

use super::action::{DiskMove, MoveError, StateError};
use super::contracts::MoveContract;
use super::invariants::HanoiInvariants;
use super::types::{HanoiState, PEG_COUNT, TARGET_PEG};
use strictly_contracts::{Contract, InvariantSet};
use tracing::{debug, instrument, warn};

/// Disk-relocation puzzle engine.
///
/// The engine is stateless apart from the disk count; positions are passed
/// in and new positions are returned, so a rejected move can never leave a
/// half-applied position behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hanoi {
    disks: u32,
}

impl Hanoi {
    /// Creates an engine for `disks` disks.
    pub const fn new(disks: u32) -> Self {
        Self { disks }
    }

    /// Returns the disk count.
    pub fn disks(&self) -> u32 {
        self.disks
    }

    /// Starting position: every disk on peg 0, largest at the bottom.
    pub fn initial_state(&self) -> HanoiState {
        HanoiState::initial(self.disks)
    }

    /// Checks a move against the rules without applying it.
    pub fn check_move(&self, state: &HanoiState, mov: &DiskMove) -> Result<(), MoveError> {
        MoveContract::pre(self, state, mov)
    }

    /// Returns true if the move may be applied to `state`.
    pub fn is_legal(&self, state: &HanoiState, mov: &DiskMove) -> bool {
        self.check_move(state, mov).is_ok()
    }

    /// Applies a move, returning the new position.
    ///
    /// # Errors
    ///
    /// Returns the first broken rule if the move is illegal, or
    /// [`MoveError::InvariantViolation`] if the result is somehow corrupt.
    #[instrument(skip(self, state), fields(disks = self.disks))]
    pub fn apply(&self, state: &HanoiState, mov: &DiskMove) -> Result<HanoiState, MoveError> {
        if let Err(e) = MoveContract::pre(self, state, mov) {
            debug!(error = %e, "Rejected disk move");
            return Err(e);
        }

        let mut next = state.clone();
        if next.transfer(mov.from_peg, mov.to_peg).is_none() {
            return Err(MoveError::InvariantViolation(format!(
                "Failed to transfer {}",
                mov
            )));
        }

        if let Err(e) = MoveContract::post(self, state, &next) {
            warn!(error = %e, "Disk move broke an invariant");
            return Err(e);
        }

        Ok(next)
    }

    /// True when every disk sits on the target peg, largest at the bottom.
    pub fn is_goal(&self, state: &HanoiState) -> bool {
        state.pegs().len() == PEG_COUNT
            && state.pegs().iter().enumerate().all(|(index, peg)| {
                if index == TARGET_PEG {
                    peg.iter().copied().eq((1..=self.disks).rev())
                } else {
                    peg.is_empty()
                }
            })
    }

    /// Checks an arbitrary position against every invariant.
    pub fn validate_state(&self, state: &HanoiState) -> Result<(), StateError> {
        HanoiInvariants::check_all(self, state).map_err(|violations| StateError { violations })
    }
}
