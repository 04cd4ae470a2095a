//! Configuration loading
//!
//! Optional `.bench.toml`:
//!
//! ```toml
//! [runtime]
//! binary = "podman"
//! context = "workload/"
//! command = "./run.sh"
//!
//! [monitor]
//! interval_ms = 300
//! max_polls = 2000
//! ```
//!
//! Every key is optional; command-line flags take precedence over the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Name of the config file searched for
pub const CONFIG_FILE_NAME: &str = ".bench.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. `start` and its parent directories (walking up to root)
/// 2. Global config at ~/.config/bandwidth-bench/
fn find_config_file(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }

    let global_path = dirs::config_dir()?.join("bandwidth-bench").join(filename);
    global_path.is_file().then_some(global_path)
}

/// Top-level config file contents
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub monitor: MonitorSection,
}

/// Container runtime section
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSection {
    /// Runtime binary (docker-compatible CLI)
    pub binary: Option<String>,
    /// Image build context directory
    pub context: Option<PathBuf>,
    /// Command run inside the container after the env assignments
    pub command: Option<String>,
}

/// Traffic monitor section
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Delay between stats queries in milliseconds
    pub interval_ms: Option<u64>,
    /// Stop with an error after this many polls of active traffic
    pub max_polls: Option<u32>,
}

impl FileConfig {
    /// Load config by searching from the current directory
    ///
    /// Returns `Ok(None)` when no config file exists anywhere on the search path.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let cwd = std::env::current_dir().map_err(|source| ConfigError::Read {
            path: PathBuf::from("."),
            source,
        })?;
        Self::load_from_dir(&cwd)
    }

    /// Load config by searching upward from `dir`
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>, ConfigError> {
        match find_config_file(dir, CONFIG_FILE_NAME) {
            Some(path) => {
                tracing::debug!("Loading config from: {}", path.display());
                Self::load_from_path(&path).map(Some)
            }
            None => {
                tracing::debug!("No {} found", CONFIG_FILE_NAME);
                Ok(None)
            }
        }
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_file() {
        let config: FileConfig = toml::from_str(
            r#"
            [runtime]
            binary = "podman"
            context = "workload"
            command = "./run.sh --quiet"

            [monitor]
            interval_ms = 500
            max_polls = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.runtime.binary.as_deref(), Some("podman"));
        assert_eq!(config.runtime.context, Some(PathBuf::from("workload")));
        assert_eq!(config.monitor.interval_ms, Some(500));
        assert_eq!(config.monitor.max_polls, Some(10));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<FileConfig>("[monitor]\ninterval = 3\n").is_err());
    }

    #[test]
    fn test_found_in_parent_directory() {
        let root = TempDir::new().unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[runtime]\nbinary = \"podman\"\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = FileConfig::load_from_dir(&nested).unwrap().unwrap();
        assert_eq!(config.runtime.binary.as_deref(), Some("podman"));
    }

    #[test]
    fn test_parse_error_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[monitor\n").unwrap();

        let err = FileConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
