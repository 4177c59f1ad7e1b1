//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every section is
//! optional so an empty file yields the defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Gemini model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Firestore database used when none is configured.
pub const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// TOML files in the data directory.
    #[default]
    Local,
    /// Cloud Firestore over REST.
    Firestore,
    /// Process memory only; nothing survives a restart.
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Local => "local",
            StorageBackend::Firestore => "firestore",
            StorageBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "toml" => Ok(StorageBackend::Local),
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Overrides the default data directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl GeminiConfig {
    pub fn model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }
}

// Keeps the key out of logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"***")
            .field("model_name", &self.model_name)
            .finish()
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    #[serde(default)]
    pub database: Option<String>,
}

impl FirestoreConfig {
    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_FIRESTORE_DATABASE)
    }
}

impl fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field("api_key", &"***")
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}
