//! Transform-patcher for nbdelta.
//!
//! Given an [`EditScript`](nbdelta_diff::EditScript) between an old and a new
//! unit sequence, the previously transformed output for the old sequence, and
//! the raw units of the new sequence, produces the transformed output for the
//! new sequence. Only units inside non-`equal` opcodes are transformed;
//! everything else is reused from the previous output.
//!
//! The patcher never mutates its inputs. Each call builds a fresh output
//! vector owned by the caller, so independent patches may run on separate
//! threads without coordination.

pub mod error;
pub mod patcher;
pub mod plan;

pub use error::{BoxError, PatchError, PatchResult, Side};
pub use patcher::{patch, patch_with, try_patch, PatchOptions, PatchOutcome, PatchStats};
pub use plan::{plan, PatchStep};
