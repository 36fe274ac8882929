//! Document formats: turning bytes into an ordered unit list.

use std::path::Path;

use nbdelta_types::{unit_from_value, Unit};
use serde_json::Value;

use crate::error::{NotebookError, NotebookResult};

/// A document format that splits raw bytes into ordered units.
pub trait DocumentFormat: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// File extensions (without the dot) this format handles.
    fn extensions(&self) -> &[&str];

    /// Parse the document into its ordered units.
    ///
    /// Errors are plain descriptions; callers record them as data.
    fn parse_units(&self, bytes: &[u8]) -> Result<Vec<Unit>, String>;

    /// Returns `true` if `path` has one of this format's extensions.
    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Jupyter notebooks (`.ipynb`), nbformat 4 and later.
///
/// Each entry of the top-level `cells` array is one unit. Earlier nbformat
/// versions nest cells inside worksheets and are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotebookFormat;

impl NotebookFormat {
    const MIN_NBFORMAT: u64 = 4;
}

impl DocumentFormat for NotebookFormat {
    fn name(&self) -> &str {
        "ipynb"
    }

    fn extensions(&self) -> &[&str] {
        &["ipynb"]
    }

    fn parse_units(&self, bytes: &[u8]) -> Result<Vec<Unit>, String> {
        let doc: Value = serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {e}"))?;
        let Value::Object(mut top) = doc else {
            return Err("notebook is not a JSON object".into());
        };

        if let Some(version) = top.get("nbformat") {
            match version.as_u64() {
                Some(v) if v >= Self::MIN_NBFORMAT => {}
                Some(v) => return Err(format!("unsupported nbformat version {v}")),
                None => return Err(format!("invalid nbformat version {version}")),
            }
        }

        let cells = match top.remove("cells") {
            Some(Value::Array(cells)) => cells,
            Some(_) => return Err("\"cells\" is not an array".into()),
            None => return Err("missing \"cells\" array".into()),
        };

        cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| unit_from_value(cell).ok_or_else(|| format!("cell {i} is not a JSON object")))
            .collect()
    }
}

/// Read and parse the units of the document at `path`.
pub fn read_units(path: &Path, format: &dyn DocumentFormat) -> NotebookResult<Vec<Unit>> {
    let bytes = std::fs::read(path).map_err(|source| NotebookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse_units(&bytes).map_err(|reason| NotebookError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}
