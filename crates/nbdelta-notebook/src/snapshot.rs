//! Snapshots: what a document looked like when it was last read.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use nbdelta_hash::ContentHasher;
use nbdelta_types::{Fingerprint, HashAlgorithm, Unit};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::format::{DocumentFormat, NotebookFormat};

/// A document's cell fingerprints plus freshness metadata at read time.
///
/// Snapshots are never updated; a later read produces a new one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Where the document was read from.
    pub path: PathBuf,
    /// Modification time at read time, if the platform reports one.
    pub modified: Option<SystemTime>,
    /// File size in bytes at read time.
    pub size: u64,
    /// The algorithm the fingerprints were computed with.
    pub algorithm: HashAlgorithm,
    /// The fingerprints, or why there are none.
    pub content: SnapshotContent,
}

/// The outcome of parsing a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotContent {
    /// One fingerprint per cell, in document order.
    Cells(Vec<Fingerprint>),
    /// The document could not be read or parsed.
    Error(String),
}

impl Snapshot {
    /// The cell fingerprints, or `None` if the snapshot carries an error.
    pub fn fingerprints(&self) -> Option<&[Fingerprint]> {
        match &self.content {
            SnapshotContent::Cells(fps) => Some(fps),
            SnapshotContent::Error(_) => None,
        }
    }

    /// The error description, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.content {
            SnapshotContent::Cells(_) => None,
            SnapshotContent::Error(e) => Some(e),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.content, SnapshotContent::Error(_))
    }

    /// Number of cells (zero for an error snapshot).
    pub fn len(&self) -> usize {
        self.fingerprints().map_or(0, <[Fingerprint]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the file's current size or modification time differs
    /// from what this snapshot recorded, or if either cannot be determined.
    pub fn is_stale(&self) -> bool {
        let Some(recorded) = self.modified else {
            return true;
        };
        match fs::metadata(&self.path) {
            Ok(meta) => meta.len() != self.size || meta.modified().ok() != Some(recorded),
            Err(_) => true,
        }
    }

    /// Returns `true` if the two snapshots disagree on their cell content.
    ///
    /// Error snapshots are always considered changed.
    pub fn units_changed(&self, other: &Snapshot) -> bool {
        match (self.fingerprints(), other.fingerprints()) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }

    fn failed(path: &Path, modified: Option<SystemTime>, size: u64, algorithm: HashAlgorithm, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            modified,
            size,
            algorithm,
            content: SnapshotContent::Error(error),
        }
    }
}

/// Extract a snapshot of the Jupyter notebook at `path`.
pub fn extract(path: impl AsRef<Path>, algorithm: HashAlgorithm) -> Snapshot {
    extract_with(path, algorithm, &NotebookFormat)
}

/// Extract a snapshot of the document at `path` using `format`.
///
/// Never fails: read and parse errors are recorded in the snapshot.
pub fn extract_with(path: impl AsRef<Path>, algorithm: HashAlgorithm, format: &dyn DocumentFormat) -> Snapshot {
    extract_units(path, algorithm, format).0
}

/// Extract a snapshot and keep the parsed units.
///
/// The units come from the same read as the fingerprints, so the two always
/// agree. On an error snapshot the unit list is empty.
pub fn extract_units(
    path: impl AsRef<Path>,
    algorithm: HashAlgorithm,
    format: &dyn DocumentFormat,
) -> (Snapshot, Vec<Unit>) {
    let path = path.as_ref();

    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot stat document");
            return (Snapshot::failed(path, None, 0, algorithm, e.to_string()), Vec::new());
        }
    };
    let modified = meta.modified().ok();

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read document");
            return (Snapshot::failed(path, modified, meta.len(), algorithm, e.to_string()), Vec::new());
        }
    };

    let units = match format.parse_units(&bytes) {
        Ok(units) => units,
        Err(reason) => {
            warn!(path = %path.display(), format = format.name(), %reason, "cannot parse document");
            return (Snapshot::failed(path, modified, meta.len(), algorithm, reason), Vec::new());
        }
    };

    let fingerprints = ContentHasher::new(algorithm).fingerprint_sequence(&units);
    debug!(path = %path.display(), cells = fingerprints.len(), %algorithm, "extracted snapshot");

    let snapshot = Snapshot {
        path: path.to_path_buf(),
        modified,
        size: meta.len(),
        algorithm,
        content: SnapshotContent::Cells(fingerprints),
    };
    (snapshot, units)
}
