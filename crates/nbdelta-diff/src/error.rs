//! Error types for the diff crate.

use nbdelta_types::HashAlgorithm;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// The two sequences were fingerprinted with different algorithms.
    #[error("cannot compare fingerprints from {first} and {second}")]
    MixedAlgorithms {
        first: HashAlgorithm,
        second: HashAlgorithm,
    },

    /// An edit script does not partition its source and target sequences.
    #[error("invalid edit script at opcode {index}: {reason}")]
    InvalidScript { index: usize, reason: String },

    /// An input handed to [`EditScript::apply`](crate::EditScript::apply)
    /// does not have the length the script was computed for.
    #[error("{input} has {actual} units but the edit script expects {expected}")]
    InputLength {
        input: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
