use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default maximum payload bytes per blob (256 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Default maximum children per list object.
pub const DEFAULT_FAN_OUT: usize = 4096;

/// Digest algorithm used to compute object ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Tuning constants for encoding and resolving a DAG.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// chunk_size = 65536
/// hash_algorithm = "sha256"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DagConfig {
    /// Maximum payload bytes per blob.
    pub chunk_size: usize,
    /// Maximum links per list object.
    pub fan_out: usize,
    /// Separator used to split a path into components.
    pub path_separator: char,
    /// Digest algorithm for object ids.
    pub hash_algorithm: HashAlgorithm,
}

impl Default for DagConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            fan_out: DEFAULT_FAN_OUT,
            path_separator: '/',
            hash_algorithm: HashAlgorithm::Blake3,
        }
    }
}

impl DagConfig {
    /// Override chunk size and fan-out, keeping the other defaults.
    pub fn with_bounds(chunk_size: usize, fan_out: usize) -> Self {
        Self {
            chunk_size,
            fan_out,
            ..Default::default()
        }
    }

    /// Reject bounds that cannot build a tree.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be positive".into()));
        }
        if self.fan_out < 2 {
            return Err(ConfigError::Invalid(format!(
                "fan_out must be at least 2, got {}",
                self.fan_out
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = DagConfig::default();
        assert_eq!(c.chunk_size, 256 * 1024);
        assert_eq!(c.fan_out, 4096);
        assert_eq!(c.path_separator, '/');
        assert_eq!(c.hash_algorithm, HashAlgorithm::Blake3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = DagConfig::from_toml_str("fan_out = 16\nhash_algorithm = \"sha256\"\n").unwrap();
        assert_eq!(c.fan_out, 16);
        assert_eq!(c.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(c.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn separator_from_toml() {
        let c = DagConfig::from_toml_str("path_separator = \"\\\\\"").unwrap();
        assert_eq!(c.path_separator, '\\');
    }

    #[test]
    fn unknown_algorithm_is_parse_error() {
        let err = DagConfig::from_toml_str("hash_algorithm = \"md5\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_chunk_size_is_invalid() {
        let err = DagConfig::from_toml_str("chunk_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn fan_out_of_one_is_invalid() {
        assert!(DagConfig::with_bounds(4, 1).validate().is_err());
        assert!(DagConfig::with_bounds(4, 2).validate().is_ok());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdag.toml");
        std::fs::write(&path, "chunk_size = 1024\n").unwrap();
        let c = DagConfig::from_file(&path).unwrap();
        assert_eq!(c.chunk_size, 1024);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DagConfig::from_file(Path::new("/nonexistent/mdag.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
