//! Unified path management for bugua files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/bugua/             # Config directory
//! ├── config.toml              # Application configuration (API keys, backend)
//! └── logs/                    # Application logs
//!     └── bugua.log.YYYY-MM-DD
//!
//! ~/.local/share/bugua/        # Data directory (local backend)
//! ├── records.toml             # All divination records, keyed by identity key
//! ├── system_prompt.toml       # Administrator-edited reading template
//! └── conversations/           # One TOML file per chat transcript
//! ```
//!
//! Both roots can be overridden, which is how tests and `--config-dir` keep
//! everything under one directory.

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "bugua";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// The platform config/data directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

#[derive(Debug, Clone, Default)]
pub struct BuguaPaths {
    config_override: Option<PathBuf>,
    data_override: Option<PathBuf>,
}

impl BuguaPaths {
    /// Platform default locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config_dir` for configuration and `config_dir/data` for data.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            data_override: Some(config_dir.join("data")),
            config_override: Some(config_dir),
        }
    }

    /// Replaces the data directory, keeping the config directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_override = Some(data_dir.into());
        self
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.config_override {
            Some(dir) => Ok(dir.clone()),
            None => dirs::config_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.data_override {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    pub fn records_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("records.toml"))
    }

    pub fn prompt_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("system_prompt.toml"))
    }

    pub fn conversations_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("conversations"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dirs_end_with_app_name() {
        let paths = BuguaPaths::new();
        if let Ok(config_dir) = paths.config_dir() {
            assert!(config_dir.ends_with("bugua"));
        }
    }

    #[test]
    fn test_override_keeps_everything_under_one_root() {
        let paths = BuguaPaths::with_config_dir("/tmp/bugua-test");
        let root = PathBuf::from("/tmp/bugua-test");

        assert_eq!(paths.config_file().unwrap(), root.join("config.toml"));
        assert_eq!(paths.logs_dir().unwrap(), root.join("logs"));
        assert!(paths.records_file().unwrap().starts_with(root.join("data")));
        assert!(paths.conversations_dir().unwrap().ends_with("conversations"));
    }

    #[test]
    fn test_data_dir_override() {
        let paths = BuguaPaths::with_config_dir("/a").with_data_dir("/b");
        assert_eq!(paths.config_dir().unwrap(), PathBuf::from("/a"));
        assert_eq!(paths.prompt_file().unwrap(), PathBuf::from("/b/system_prompt.toml"));
    }
}
