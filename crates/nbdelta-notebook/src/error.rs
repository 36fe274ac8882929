//! Error types for the notebook crate.

use std::path::PathBuf;

/// Errors raised when reading a document's units directly.
///
/// [`extract`](crate::extract) never returns these; it records them in the
/// snapshot instead.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// The document could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but is not in the expected format.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Convenience alias for notebook results.
pub type NotebookResult<T> = Result<T, NotebookError>;
