//! Contract and invariant traits shared by the puzzle engines.
//!
//! A puzzle crate describes its rules as a [`Contract`] over
//! `(rules, state, action)` and its position guarantees as [`Invariant`]s
//! composed into an [`InvariantSet`] tuple.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod contract;
mod invariant;

pub use contract::Contract;
pub use invariant::{Invariant, InvariantSet, InvariantViolation};
