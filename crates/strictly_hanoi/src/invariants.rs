//! First-class invariants for the disk-relocation puzzle.
//!
//! Invariants are checked against a position together with the engine that
//! owns it, since the expected set of disks depends on the disk count.

use super::rules::Hanoi;
use super::types::{HanoiState, PEG_COUNT};
use strictly_contracts::Invariant;

/// Invariant: the board has exactly [`PEG_COUNT`] pegs.
pub struct PegCount;

impl Invariant<Hanoi, HanoiState> for PegCount {
    fn holds(_params: &Hanoi, state: &HanoiState) -> bool {
        state.pegs().len() == PEG_COUNT
    }

    fn description() -> &'static str {
        "Board must have exactly 3 pegs"
    }
}

/// Invariant: disk sizes strictly decrease from bottom to top on every peg.
pub struct PegsDecreasing;

impl Invariant<Hanoi, HanoiState> for PegsDecreasing {
    fn holds(_params: &Hanoi, state: &HanoiState) -> bool {
        state
            .pegs()
            .iter()
            .all(|peg| peg.windows(2).all(|pair| pair[0] > pair[1]))
    }

    fn description() -> &'static str {
        "Disks must strictly decrease in size from bottom to top"
    }
}

/// Invariant: each disk `1..=N` appears exactly once across all pegs.
pub struct EveryDiskOnce;

impl Invariant<Hanoi, HanoiState> for EveryDiskOnce {
    fn holds(params: &Hanoi, state: &HanoiState) -> bool {
        let mut disks: Vec<u32> = state.pegs().iter().flatten().copied().collect();
        disks.sort_unstable();
        disks.len() == params.disks() as usize
            && disks.iter().zip(1..=params.disks()).all(|(a, b)| *a == b)
    }

    fn description() -> &'static str {
        "Every disk from 1 to N must appear exactly once"
    }
}

/// All disk puzzle invariants as a composable set.
pub type HanoiInvariants = (PegCount, PegsDecreasing, EveryDiskOnce);

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_contracts::InvariantSet;

    #[test]
    fn test_invariant_set_holds_for_initial_state() {
        let hanoi = Hanoi::new(5);
        assert!(HanoiInvariants::check_all(&hanoi, &hanoi.initial_state()).is_ok());
    }

    #[test]
    fn test_detects_upside_down_peg() {
        let hanoi = Hanoi::new(2);
        let state = HanoiState::new(vec![vec![1, 2], vec![], vec![]]);
        let violations = HanoiInvariants::check_all(&hanoi, &state).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].description, PegsDecreasing::description());
    }

    #[test]
    fn test_detects_missing_and_duplicate_disks() {
        let hanoi = Hanoi::new(3);
        let duplicated = HanoiState::new(vec![vec![3, 2], vec![2], vec![]]);
        assert!(!EveryDiskOnce::holds(&hanoi, &duplicated));

        let extra = HanoiState::new(vec![vec![4, 3, 2, 1], vec![], vec![]]);
        assert!(!EveryDiskOnce::holds(&hanoi, &extra));
    }

    #[test]
    fn test_detects_wrong_peg_count() {
        let hanoi = Hanoi::new(1);
        let state = HanoiState::new(vec![vec![1], vec![]]);
        assert!(!PegCount::holds(&hanoi, &state));
    }
}
