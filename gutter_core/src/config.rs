use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Line diff flavour used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffAlgorithm {
    /// libgit2's default Myers diff.
    #[default]
    Myers,
    /// Patience diff; steadier hunks around moved blocks.
    Patience,
    /// Myers with extra effort to find the smallest diff.
    Minimal,
}

/// Configuration for a [`crate::tracker::GutterTracker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Quiescence window in milliseconds. Default: 500ms.
    pub debounce_ms: u64,
    /// Diff algorithm. Default: Myers.
    pub algorithm: DiffAlgorithm,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            algorithm: DiffAlgorithm::Myers,
        }
    }
}

impl TrackerConfig {
    /// The quiescence window as a [`Duration`].
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse a TOML document; missing keys fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the document is not valid TOML or a key
    /// has the wrong type.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and [`Error::Config`]
    /// when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_window() {
        let config = TrackerConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.algorithm, DiffAlgorithm::Myers);
    }

    #[test]
    fn partial_document_keeps_defaults() -> Result<()> {
        let config = TrackerConfig::from_toml_str("algorithm = \"patience\"\n")?;
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.algorithm, DiffAlgorithm::Patience);

        let config = TrackerConfig::from_toml_str("debounce_ms = 120\n")?;
        assert_eq!(config.debounce(), Duration::from_millis(120));
        Ok(())
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        let result = TrackerConfig::from_toml_str("debounce_ms = \"soon\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn load_reads_file() -> Result<()> {
        let temp = tempfile::TempDir::new().expect("tempdir");
        let path = temp.path().join("gutter.toml");
        std::fs::write(&path, "debounce_ms = 250\nalgorithm = \"minimal\"\n").expect("write");

        let config = TrackerConfig::load(&path)?;
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.algorithm, DiffAlgorithm::Minimal);
        Ok(())
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = TrackerConfig::load("/definitely/not/here/gutter.toml");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
