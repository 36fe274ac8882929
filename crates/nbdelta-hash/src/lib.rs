//! Content hasher for nbdelta.
//!
//! Fingerprints a [`Unit`](nbdelta_types::Unit) by digesting its canonical
//! serialization. Canonicalization sorts field names at every nesting level,
//! so units that differ only in field insertion order fingerprint identically.
//!
//! All digests wrap established libraries (`blake3`, `sha2`).

pub mod canonical;
pub mod hasher;

pub use canonical::{canonical_bytes, canonical_value_bytes};
pub use hasher::{
    fingerprint, fingerprint_named, fingerprint_sequence, ContentHasher, HashError, HashResult,
};
