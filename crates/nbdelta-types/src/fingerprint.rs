use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::HashAlgorithm;
use crate::error::TypeError;

/// Length in bytes of every supported digest.
pub const DIGEST_LEN: usize = 32;

/// Content fingerprint of a single unit.
///
/// A `Fingerprint` is the digest of a unit's canonical serialization together
/// with the algorithm that produced it. Two units with the same fields and
/// values always fingerprint identically under the same algorithm. Equality
/// includes the algorithm, so fingerprints from different algorithms never
/// compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint {
    algorithm: HashAlgorithm,
    #[serde(with = "hex_digest")]
    digest: [u8; DIGEST_LEN],
}

impl Fingerprint {
    /// Create a fingerprint from a pre-computed digest.
    pub fn from_digest(algorithm: HashAlgorithm, digest: [u8; DIGEST_LEN]) -> Self {
        Self { algorithm, digest }
    }

    /// The algorithm that produced this fingerprint.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Hex-encoded digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.digest[..4])
    }

    /// Parse a hex digest produced by `algorithm`.
    pub fn from_hex(algorithm: HashAlgorithm, s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&bytes);
        Ok(Self { algorithm, digest })
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({}:{})", self.algorithm, self.short_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

mod hex_digest {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::DIGEST_LEN;

    pub fn serialize<S: Serializer>(digest: &[u8; DIGEST_LEN], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(digest))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; DIGEST_LEN], D::Error> {
        let s = String::deserialize(d)?;
        let bytes = hex::decode(&s).map_err(de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|b: Vec<u8>| de::Error::invalid_length(b.len(), &"32 bytes"))
    }
}
