use std::collections::BTreeMap;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nbdelta_diff::diff_with;
use nbdelta_notebook::{extract_units, DocumentFormat, NotebookFormat, Snapshot};
use nbdelta_patch::{try_patch, BoxError, PatchStats};
use nbdelta_types::Unit;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::ConverterConfig;
use crate::error::{SdkError, SdkResult};

/// How a conversion was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionKind {
    /// The document was unchanged on disk; the cached output was returned.
    Fresh,
    /// The cached output was patched with re-converted changed cells.
    Patched,
    /// No usable cache entry existed; every cell was converted.
    Full,
}

/// Result of converting one document.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion<T> {
    pub kind: ConversionKind,
    /// One converted value per cell, in document order.
    pub output: Arc<Vec<T>>,
    pub stats: PatchStats,
}

/// A converted document as held in the cache.
#[derive(Clone, Debug)]
pub struct CachedDocument<T> {
    pub snapshot: Snapshot,
    pub output: Arc<Vec<T>>,
}

/// Outcome of [`IncrementalConverter::convert_dir`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Documents converted successfully.
    pub converted: Vec<(PathBuf, ConversionKind)>,
    /// Documents that failed, with the reason.
    pub failed: Vec<(PathBuf, SdkError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of successfully converted documents whose conversion was of
    /// the given `kind`.
    pub fn converted_count(&self, kind: ConversionKind) -> usize {
        self.converted.iter().filter(|(_, k)| *k == kind).count()
    }
}

/// Converts documents cell by cell, reusing previous results for unchanged
/// cells.
///
/// The cache lives in memory and is owned by the converter. Entries are
/// replaced wholesale after each successful conversion; an output handed out
/// earlier is never mutated.
pub struct IncrementalConverter<T> {
    config: ConverterConfig,
    format: Box<dyn DocumentFormat>,
    cache: BTreeMap<PathBuf, CachedDocument<T>>,
}

impl<T> std::fmt::Debug for IncrementalConverter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalConverter")
            .field("config", &self.config)
            .field("format", &self.format.name())
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl<T: Clone + PartialEq> IncrementalConverter<T> {
    /// Create a converter for Jupyter notebooks.
    pub fn new(config: ConverterConfig) -> Self {
        Self::with_format(config, NotebookFormat)
    }

    /// Create a converter for an arbitrary document format.
    pub fn with_format(config: ConverterConfig, format: impl DocumentFormat + 'static) -> Self {
        Self {
            config,
            format: Box::new(format),
            cache: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// The cached entry for `path`, if any.
    pub fn cached(&self, path: impl AsRef<Path>) -> Option<&CachedDocument<T>> {
        self.cache.get(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop the cached entry for `path`. Returns `true` if one existed.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.cache.remove(path.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Convert the document at `path` with an infallible transform.
    pub fn convert<F>(&mut self, path: impl AsRef<Path>, mut transform: F) -> SdkResult<Conversion<T>>
    where
        F: FnMut(&Unit) -> T,
    {
        self.try_convert(path, |unit: &Unit| Ok::<_, Infallible>(transform(unit)))
    }

    /// Convert the document at `path`.
    ///
    /// The transform must be deterministic: a cell with unchanged content is
    /// assumed to convert to the value cached for it.
    ///
    /// If the document cannot be read or parsed, returns
    /// [`SdkError::Parse`] and leaves any cached entry in place.
    pub fn try_convert<F, E>(&mut self, path: impl AsRef<Path>, transform: F) -> SdkResult<Conversion<T>>
    where
        F: FnMut(&Unit) -> Result<T, E>,
        E: Into<BoxError>,
    {
        let path = path.as_ref();

        if let Some(cached) = self.cache.get(path) {
            if !cached.snapshot.is_stale() {
                debug!(path = %path.display(), "document unchanged; reusing cached output");
                return Ok(Conversion {
                    kind: ConversionKind::Fresh,
                    output: Arc::clone(&cached.output),
                    stats: PatchStats {
                        reused: cached.output.len(),
                        ..Default::default()
                    },
                });
            }
        }

        let algorithm = self.config.hash_algorithm;
        let (snapshot, units) = extract_units(path, algorithm, self.format.as_ref());
        let new_fps = match (snapshot.fingerprints(), snapshot.error()) {
            (Some(fps), _) => fps,
            (None, reason) => {
                return Err(SdkError::Parse {
                    path: path.to_path_buf(),
                    reason: reason.unwrap_or_default().to_string(),
                })
            }
        };

        // A cache entry is only usable if it was fingerprinted the same way.
        let previous = self.cache.get(path).and_then(|c| {
            c.snapshot
                .fingerprints()
                .filter(|_| c.snapshot.algorithm == algorithm)
                .map(|fps| (fps, c.output.as_slice()))
        });
        let (kind, old_fps, old_output) = match previous {
            Some((fps, output)) => (ConversionKind::Patched, fps, output),
            None => (ConversionKind::Full, &[][..], &[][..]),
        };

        let script = diff_with(old_fps, new_fps, &self.config.diff)?;
        let outcome = try_patch(&script, old_output, &units, transform, &self.config.patch)?;

        debug!(
            path = %path.display(),
            kind = ?kind,
            cells = units.len(),
            transformed = outcome.stats.transformed,
            reused = outcome.stats.reused,
            "converted document"
        );

        let output = Arc::new(outcome.output);
        self.cache.insert(
            path.to_path_buf(),
            CachedDocument {
                snapshot,
                output: Arc::clone(&output),
            },
        );
        Ok(Conversion {
            kind,
            output,
            stats: outcome.stats,
        })
    }

    /// Convert every document under `root` that matches the converter's
    /// format, in sorted path order.
    ///
    /// A failing document is recorded in the report and does not stop the
    /// batch.
    pub fn convert_dir<F, E>(&mut self, root: impl AsRef<Path>, mut transform: F) -> BatchReport
    where
        F: FnMut(&Unit) -> Result<T, E>,
        E: Into<BoxError>,
    {
        let root = root.as_ref();
        let mut report = BatchReport::default();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    report.failed.push((path, SdkError::Walk(e.to_string())));
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.format.matches(entry.path()) {
                continue;
            }

            match self.try_convert(entry.path(), &mut transform) {
                Ok(conversion) => report.converted.push((entry.path().to_path_buf(), conversion.kind)),
                Err(e) => report.failed.push((entry.path().to_path_buf(), e)),
            }
        }

        info!(
            root = %root.display(),
            converted = report.converted.len(),
            failed = report.failed.len(),
            "batch conversion complete"
        );
        report
    }
}
