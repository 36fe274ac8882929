//! Foundation types for nbdelta.
//!
//! Every other nbdelta crate depends on `nbdelta-types`. The types here are
//! deliberately small: a document is a flat, ordered list of [`Unit`]s, and
//! each unit is identified for comparison purposes only by its
//! [`Fingerprint`].
//!
//! # Key Types
//!
//! - [`Unit`] — One addressable cell of a document (a JSON object)
//! - [`Fingerprint`] — Content digest of a unit, tagged with its algorithm
//! - [`HashAlgorithm`] — The fixed set of supported digest functions

pub mod algorithm;
pub mod error;
pub mod fingerprint;
pub mod unit;

pub use algorithm::HashAlgorithm;
pub use error::TypeError;
pub use fingerprint::{Fingerprint, DIGEST_LEN};
pub use unit::{unit_from_value, Unit};
