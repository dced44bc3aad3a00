//! Configuration types for the media renamer

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the media renamer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extensions whose files are opened to read embedded capture dates.
    /// Restricted to still-image containers; videos never carry EXIF here.
    pub metadata_extensions: Vec<String>,

    /// Number of threads for the inspection phase (0 = auto)
    pub threads: usize,

    /// Dry run mode - compute new names without renaming
    pub dry_run: bool,

    /// Verbose output
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata_extensions: vec![
                "jpg".into(), "jpeg".into(), "tif".into(), "tiff".into(),
                "png".into(), "webp".into(), "heic".into(), "heif".into(),
            ],
            threads: 0, // Auto-detect
            dry_run: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Check if files with this extension should be inspected for metadata dates
    pub fn is_metadata_candidate(&self, ext: &str) -> bool {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();
        self.metadata_extensions.iter().any(|e| e == &ext_lower)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parse configuration from TOML text, lower-casing extensions
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        for ext in &mut config.metadata_extensions {
            *ext = ext.trim_start_matches('.').to_lowercase();
        }
        Ok(config)
    }

    /// Serialize configuration to TOML text
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError { source: e })
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Media Renamer Configuration File
# This file uses TOML format (https://toml.io)

# Extensions whose embedded EXIF dates are consulted when the filename
# carries no recognizable timestamp. Keep this to still-image formats:
# opening videos here only wastes time.
metadata_extensions = ["jpg", "jpeg", "tif", "tiff", "png", "webp", "heic", "heif"]

# Number of threads used to inspect files (0 = auto-detect).
# Renames themselves always happen one at a time.
threads = 0

# Dry run mode - show what would be renamed without renaming anything
dry_run = false

# Verbose output - show detailed processing information
verbose = false
"#
        .to_string()
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize configuration
    SerializeError {
        source: toml::ser::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::SerializeError { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::SerializeError { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_metadata_candidate() {
        let config = Config::default();
        assert!(config.is_metadata_candidate("jpg"));
        assert!(config.is_metadata_candidate("JPG"));
        assert!(config.is_metadata_candidate(".png"));
        assert!(!config.is_metadata_candidate("mp4"));
        assert!(!config.is_metadata_candidate(""));
    }

    #[test]
    fn test_sample_config_parses() {
        let config = Config::from_toml(&Config::sample_config()).unwrap();
        assert_eq!(config.metadata_extensions, Config::default().metadata_extensions);
        assert_eq!(config.threads, 0);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("metadata_extensions = [\".JPG\", \"Png\"]").unwrap();
        assert_eq!(config.metadata_extensions, vec!["jpg", "png"]);
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::load_from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("renamer.toml");
        let config = Config {
            threads: 4,
            ..Config::default()
        };
        fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.threads, 4);
    }
}
