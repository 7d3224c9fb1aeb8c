//! Core domain types for the disk-relocation puzzle.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier of a disk, which doubles as its size. Disk 1 is the smallest.
pub type DiskId = u32;

/// Number of pegs on the board.
pub const PEG_COUNT: usize = 3;

/// Peg that must hold every disk once the puzzle is solved.
pub const TARGET_PEG: usize = 2;

/// Pegs of the puzzle, each a stack of disks listed bottom to top.
///
/// Serializes as a bare list of pegs, e.g. `[[3,2,1],[],[]]`. Construction
/// is unchecked so that externally supplied positions can be represented
/// before they are validated with [`crate::Hanoi::validate_state`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HanoiState {
    pegs: Vec<Vec<DiskId>>,
}

impl HanoiState {
    /// Wraps the given pegs without validating them.
    pub fn new(pegs: Vec<Vec<DiskId>>) -> Self {
        Self { pegs }
    }

    /// All disks stacked on peg 0, largest at the bottom.
    pub fn initial(disks: u32) -> Self {
        let mut pegs = vec![Vec::new(); PEG_COUNT];
        pegs[0] = (1..=disks).rev().collect();
        Self { pegs }
    }

    /// Returns every peg, bottom to top.
    pub fn pegs(&self) -> &[Vec<DiskId>] {
        &self.pegs
    }

    /// Returns one peg, if it exists.
    pub fn peg(&self, index: usize) -> Option<&[DiskId]> {
        self.pegs.get(index).map(Vec::as_slice)
    }

    /// Returns the topmost disk on a peg.
    pub fn top(&self, index: usize) -> Option<DiskId> {
        self.peg(index).and_then(|peg| peg.last().copied())
    }

    /// Total number of disks across all pegs.
    pub fn disk_count(&self) -> usize {
        self.pegs.iter().map(Vec::len).sum()
    }

    /// Moves the top disk of `from` onto `to` without checking legality.
    pub(crate) fn transfer(&mut self, from: usize, to: usize) -> Option<DiskId> {
        let disk = self.pegs.get_mut(from)?.pop()?;
        match self.pegs.get_mut(to) {
            Some(peg) => {
                peg.push(disk);
                Some(disk)
            }
            None => {
                // Put it back so a bad index never loses a disk.
                self.pegs[from].push(disk);
                None
            }
        }
    }

    /// Formats the pegs one per line, e.g. `peg 0: 3 2 1`.
    pub fn display(&self) -> String {
        self.pegs
            .iter()
            .enumerate()
            .map(|(index, peg)| {
                let disks: Vec<String> = peg.iter().map(ToString::to_string).collect();
                if disks.is_empty() {
                    format!("peg {}: (empty)", index)
                } else {
                    format!("peg {}: {}", index, disks.join(" "))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for HanoiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
