//! Pure rules for the disk-relocation puzzle (Tower of Hanoi).
//!
//! The crate has no notion of sessions or transports. It knows how to build
//! the starting position, decide whether a move is legal, apply it, recognise
//! the goal, and check that an arbitrary position satisfies the puzzle's
//! invariants.
//!
//! ```
//! use strictly_hanoi::{DiskMove, Hanoi};
//!
//! let hanoi = Hanoi::new(3);
//! let start = hanoi.initial_state();
//! let next = hanoi.apply(&start, &DiskMove::new(1, 0, 2)).unwrap();
//! assert_eq!(next.pegs(), &[vec![3, 2], vec![], vec![1]]);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod invariants;
mod rules;
mod types;

pub use action::{DiskMove, MoveError, StateError};
pub use contracts::{
    DistinctPegs, LegalMove, MoveContract, PegsExist, SmallerOntoLarger, TopDiskMatches,
};
pub use invariants::{EveryDiskOnce, HanoiInvariants, PegCount, PegsDecreasing};
pub use strictly_contracts::{Contract, Invariant, InvariantSet, InvariantViolation};
pub use rules::Hanoi;
pub use types::{DiskId, HanoiState, PEG_COUNT, TARGET_PEG};
