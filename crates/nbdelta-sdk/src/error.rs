use std::path::PathBuf;

/// Errors from the SDK.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot convert {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("diff error: {0}")]
    Diff(#[from] nbdelta_diff::DiffError),

    #[error("patch error: {0}")]
    Patch(#[from] nbdelta_patch::PatchError),

    #[error("directory walk failed: {0}")]
    Walk(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
