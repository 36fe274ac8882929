//! Error types for the patch crate.

use nbdelta_diff::DiffError;

/// Boxed error returned by a fallible transform.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which input failed the alignment check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The previously transformed output.
    Old,
    /// The raw units of the new document.
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Old => f.write_str("old transformed output"),
            Side::New => f.write_str("new raw units"),
        }
    }
}

/// Errors that can occur while patching.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// An input's length does not match the sequence the edit script was
    /// computed for.
    #[error("{side} has {actual} units but the edit script expects {expected}")]
    Alignment {
        side: Side,
        expected: usize,
        actual: usize,
    },

    /// The edit script does not partition its own sequences.
    #[error(transparent)]
    Script(#[from] DiffError),

    /// Verification mode found a unit where the patched output differs from
    /// a from-scratch transform.
    #[error("patched output differs from full transform at index {index}")]
    Verification { index: usize },

    /// The transform failed on a unit of the new sequence.
    #[error("transform failed on unit {index}: {source}")]
    Transform {
        index: usize,
        #[source]
        source: BoxError,
    },
}

/// Convenience alias for patch results.
pub type PatchResult<T> = Result<T, PatchError>;
