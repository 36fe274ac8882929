use std::path::Path;

use nbdelta_diff::DiffOptions;
use nbdelta_patch::PatchOptions;
use nbdelta_types::HashAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Configuration for an [`IncrementalConverter`](crate::IncrementalConverter).
///
/// Loadable from TOML:
///
/// ```toml
/// hash_algorithm = "sha256"
///
/// [diff]
/// algorithm = "patience"
/// timeout_ms = 50
///
/// [patch]
/// verify = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Digest used to fingerprint cells.
    pub hash_algorithm: HashAlgorithm,
    /// Sequence differ options.
    pub diff: DiffOptions,
    /// Patcher options.
    pub patch: PatchOptions,
}

impl ConverterConfig {
    /// Default configuration with patch verification turned on.
    pub fn verified() -> Self {
        Self {
            patch: PatchOptions::verified(),
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        toml::from_str(s).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serialize the configuration as TOML.
    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string(self).map_err(|e| SdkError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbdelta_diff::DiffAlgorithm;

    #[test]
    fn default_config() {
        let c = ConverterConfig::default();
        assert_eq!(c.hash_algorithm, HashAlgorithm::Blake3);
        assert_eq!(c.diff.algorithm, DiffAlgorithm::Myers);
        assert!(c.diff.timeout_ms.is_none());
        assert!(!c.patch.verify);
    }

    #[test]
    fn parses_full_toml() {
        let c = ConverterConfig::from_toml_str(
            r#"
            hash_algorithm = "sha256"

            [diff]
            algorithm = "patience"
            timeout_ms = 50

            [patch]
            verify = true
            "#,
        )
        .unwrap();
        assert_eq!(c.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(c.diff.algorithm, DiffAlgorithm::Patience);
        assert_eq!(c.diff.timeout_ms, Some(50));
        assert!(c.patch.verify);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ConverterConfig::from_toml_str("").unwrap(), ConverterConfig::default());
    }

    #[test]
    fn unknown_algorithm_fails_fast() {
        let err = ConverterConfig::from_toml_str(r#"hash_algorithm = "md5""#).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = ConverterConfig::verified();
        let text = c.to_toml_string().unwrap();
        assert_eq!(ConverterConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nbdelta.toml");
        std::fs::write(&path, "[diff]\nalgorithm = \"lcs\"\n").unwrap();
        let c = ConverterConfig::load(&path).unwrap();
        assert_eq!(c.diff.algorithm, DiffAlgorithm::Lcs);

        assert!(matches!(
            ConverterConfig::load(dir.path().join("missing.toml")),
            Err(SdkError::Config(_))
        ));
    }
}
