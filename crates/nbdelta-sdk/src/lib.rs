//! High-level incremental conversion API.
//!
//! [`IncrementalConverter`] keeps the converted output of each document it
//! has seen. On the next request it re-reads the document, diffs the new cell
//! fingerprints against the cached ones, and re-converts only the cells that
//! changed.
//!
//! ```no_run
//! use nbdelta_sdk::{ConverterConfig, IncrementalConverter};
//!
//! let mut converter = IncrementalConverter::new(ConverterConfig::default());
//! let first = converter.convert("analysis.ipynb", |cell| format!("{cell:?}"))?;
//! let again = converter.convert("analysis.ipynb", |cell| format!("{cell:?}"))?;
//! assert_eq!(first.output, again.output);
//! # Ok::<(), nbdelta_sdk::SdkError>(())
//! ```

pub mod config;
pub mod converter;
pub mod error;

pub use config::ConverterConfig;
pub use converter::{BatchReport, CachedDocument, Conversion, ConversionKind, IncrementalConverter};
pub use error::{SdkError, SdkResult};
