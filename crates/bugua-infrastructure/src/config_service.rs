//! Configuration loading.
//!
//! Reads `config.toml` from the config directory and layers environment
//! variables on top:
//!
//! | Variable                | Overrides                    |
//! |-------------------------|------------------------------|
//! | `GEMINI_API_KEY`        | `gemini.api_key`             |
//! | `GEMINI_MODEL`          | `gemini.model_name`          |
//! | `BUGUA_STORAGE_BACKEND` | `storage.backend`            |
//! | `FIRESTORE_PROJECT_ID`  | `firestore.project_id`       |
//! | `FIRESTORE_API_KEY`     | `firestore.api_key`          |

use crate::paths::BuguaPaths;
use crate::storage::{AtomicTomlError, AtomicTomlFile};
use bugua_core::config::{AppConfig, FirestoreConfig, GeminiConfig};
use bugua_core::error::{BuguaError, Result};
use std::path::PathBuf;

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_STORAGE_BACKEND: &str = "BUGUA_STORAGE_BACKEND";
pub const ENV_FIRESTORE_PROJECT_ID: &str = "FIRESTORE_PROJECT_ID";
pub const ENV_FIRESTORE_API_KEY: &str = "FIRESTORE_API_KEY";

const CONFIG_TEMPLATE: &str = r#"# bugua configuration

[storage]
# local | firestore | memory
backend = "local"

# [gemini]
# api_key = ""
# model_name = "gemini-2.5-flash"

# [firestore]
# project_id = ""
# api_key = ""

[capture]
enabled = true
"#;

#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: BuguaPaths,
}

impl ConfigService {
    pub fn new(paths: BuguaPaths) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        self.paths
            .config_file()
            .map_err(|e| BuguaError::config(e.to_string()))
    }

    /// Loads the file and applies environment overrides from the process.
    pub fn load(&self) -> Result<AppConfig> {
        let config = self.load_file()?;
        Ok(apply_env_overrides(config, |name| std::env::var(name).ok()))
    }

    /// Loads only the file. Missing or empty files yield defaults.
    pub fn load_file(&self) -> Result<AppConfig> {
        let path = self.config_path()?;
        let file = AtomicTomlFile::<AppConfig>::new(path.clone());
        match file.load() {
            Ok(config) => Ok(config.unwrap_or_default()),
            Err(AtomicTomlError::Parse(e)) => Err(BuguaError::serialization(
                "TOML",
                format!("{:?}: {}", path, e),
            )),
            Err(e) => Err(BuguaError::io(format!("{:?}: {}", path, e))),
        }
    }

    /// Writes a commented template if no config file exists yet.
    ///
    /// The file may hold API keys, so on Unix it is made owner-only.
    pub fn ensure_config_file(&self) -> Result<PathBuf> {
        let path = self.config_path()?;
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, CONFIG_TEMPLATE)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!("[Config] Created {:?}", path);
        Ok(path)
    }
}

/// Applies environment overrides using `lookup` to read variables.
///
/// Blank values are ignored. An unknown backend name is logged and ignored.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(api_key) = var(ENV_GEMINI_API_KEY) {
        match config.gemini.as_mut() {
            Some(gemini) => gemini.api_key = api_key,
            None => {
                config.gemini = Some(GeminiConfig {
                    api_key,
                    model_name: None,
                })
            }
        }
    }
    if let Some(model) = var(ENV_GEMINI_MODEL) {
        if let Some(gemini) = config.gemini.as_mut() {
            gemini.model_name = Some(model);
        }
    }

    if let Some(backend) = var(ENV_STORAGE_BACKEND) {
        match backend.parse() {
            Ok(backend) => config.storage.backend = backend,
            Err(e) => tracing::warn!("[Config] Ignoring {}: {}", ENV_STORAGE_BACKEND, e),
        }
    }

    let project_id = var(ENV_FIRESTORE_PROJECT_ID);
    let firestore_key = var(ENV_FIRESTORE_API_KEY);
    match (config.firestore.as_mut(), project_id, firestore_key) {
        (Some(firestore), project_id, api_key) => {
            if let Some(project_id) = project_id {
                firestore.project_id = project_id;
            }
            if let Some(api_key) = api_key {
                firestore.api_key = api_key;
            }
        }
        (None, Some(project_id), Some(api_key)) => {
            config.firestore = Some(FirestoreConfig {
                project_id,
                api_key,
                database: None,
            });
        }
        _ => {}
    }

    config
}
