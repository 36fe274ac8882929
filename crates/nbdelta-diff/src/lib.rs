//! Sequence differ for nbdelta.
//!
//! Computes an ordered edit script between two fingerprint sequences. The
//! script is a gapless list of [`Opcode`]s (equal / replace / delete /
//! insert) whose source ranges partition the old sequence and whose target
//! ranges partition the new one.
//!
//! # Key Types
//!
//! - [`EditScript`] / [`Opcode`] / [`OpKind`] -- The edit script
//! - [`DiffOptions`] / [`DiffAlgorithm`] -- Algorithm selection and deadline

pub mod differ;
pub mod error;
pub mod script;

pub use differ::{diff, diff_with, DiffAlgorithm, DiffOptions};
pub use error::{DiffError, DiffResult};
pub use script::{EditScript, OpKind, Opcode};
