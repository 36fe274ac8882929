use nbdelta_types::{Fingerprint, HashAlgorithm, Unit, DIGEST_LEN};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical::{canonical_bytes, canonical_value_bytes};

/// Domain-separated unit hasher.
///
/// Every digest is computed over `"nbdelta-unit-v1:"` followed by the
/// canonical bytes, so a unit fingerprint never collides with a plain digest
/// of the same bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentHasher {
    algorithm: HashAlgorithm,
}

impl ContentHasher {
    const DOMAIN: &'static str = "nbdelta-unit-v1";

    /// Create a hasher for the given algorithm.
    pub const fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Create a hasher by algorithm name, failing fast on unknown names.
    pub fn named(name: &str) -> HashResult<Self> {
        HashAlgorithm::from_name(name)
            .map(Self::new)
            .map_err(|_| HashError::UnsupportedAlgorithm(name.to_string()))
    }

    /// The algorithm used by this hasher.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Fingerprint {
        let digest: [u8; DIGEST_LEN] = match self.algorithm {
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(Self::DOMAIN.as_bytes());
                hasher.update(b":");
                hasher.update(data);
                *hasher.finalize().as_bytes()
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(Self::DOMAIN.as_bytes());
                hasher.update(b":");
                hasher.update(data);
                hasher.finalize().into()
            }
        };
        Fingerprint::from_digest(self.algorithm, digest)
    }

    /// Fingerprint a unit.
    pub fn fingerprint(&self, unit: &Unit) -> Fingerprint {
        self.hash(&canonical_bytes(unit))
    }

    /// Fingerprint an arbitrary JSON value.
    pub fn fingerprint_value(&self, value: &Value) -> Fingerprint {
        self.hash(&canonical_value_bytes(value))
    }

    /// Fingerprint each unit in order.
    pub fn fingerprint_sequence(&self, units: &[Unit]) -> Vec<Fingerprint> {
        units.iter().map(|u| self.fingerprint(u)).collect()
    }

    /// Verify that a unit produces the expected fingerprint.
    pub fn verify(&self, unit: &Unit, expected: &Fingerprint) -> bool {
        self.fingerprint(unit) == *expected
    }
}

/// Fingerprint a unit with the given algorithm.
pub fn fingerprint(unit: &Unit, algorithm: HashAlgorithm) -> Fingerprint {
    ContentHasher::new(algorithm).fingerprint(unit)
}

/// Fingerprint a unit with an algorithm selected by name.
pub fn fingerprint_named(unit: &Unit, algorithm: &str) -> HashResult<Fingerprint> {
    Ok(ContentHasher::named(algorithm)?.fingerprint(unit))
}

/// Fingerprint each unit in order with the given algorithm.
pub fn fingerprint_sequence(units: &[Unit], algorithm: HashAlgorithm) -> Vec<Fingerprint> {
    ContentHasher::new(algorithm).fingerprint_sequence(units)
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HashError {
    #[error("unsupported digest algorithm: {0:?}")]
    UnsupportedAlgorithm(String),
}

/// Result alias for hashing operations.
pub type HashResult<T> = Result<T, HashError>;
