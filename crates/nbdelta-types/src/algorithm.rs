use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A supported digest function for fingerprinting units.
///
/// Fingerprints produced by different algorithms are never comparable. The
/// algorithm is fixed for the lifetime of a comparison and travels with every
/// [`Fingerprint`](crate::Fingerprint) so mixing can be detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3: fast and cryptographic-strength.
    #[default]
    Blake3,
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Every supported algorithm, in declaration order.
    pub const ALL: [HashAlgorithm; 2] = [HashAlgorithm::Blake3, HashAlgorithm::Sha256];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// Look up an algorithm by name (case-insensitive).
    ///
    /// Accepts `blake3`, `sha256` and `sha-256`.
    pub fn from_name(name: &str) -> Result<Self, TypeError> {
        match name.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            _ => Err(TypeError::UnsupportedAlgorithm(name.to_string())),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
