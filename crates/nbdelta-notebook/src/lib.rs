//! Document metadata extractor for nbdelta.
//!
//! Reads a document, splits it into its ordered cells, and records a
//! [`Snapshot`]: the cell fingerprints plus the file size and modification
//! time observed at read time. A document that cannot be read or parsed
//! still yields a snapshot, carrying an error marker instead of
//! fingerprints, so batch callers can fall back to a full conversion.
//!
//! # Key Types
//!
//! - [`Snapshot`] / [`SnapshotContent`] -- What was observed at read time
//! - [`DocumentFormat`] -- Parses document bytes into units
//! - [`NotebookFormat`] -- Jupyter `.ipynb` (nbformat 4+)

pub mod error;
pub mod format;
pub mod snapshot;

pub use error::{NotebookError, NotebookResult};
pub use format::{read_units, DocumentFormat, NotebookFormat};
pub use snapshot::{extract, extract_units, extract_with, Snapshot, SnapshotContent};
