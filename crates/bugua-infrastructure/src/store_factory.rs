//! Backend selection.
//!
//! The storage backend is chosen once at startup; everything downstream only
//! sees trait objects.

use crate::firestore::{
    FirestoreClient, FirestoreConversationRepository, FirestoreDivinationRepository,
    FirestorePromptRepository,
};
use crate::memory_repository::{
    InMemoryConversationRepository, InMemoryDivinationRepository, InMemoryPromptRepository,
};
use crate::paths::BuguaPaths;
use crate::toml_conversation_repository::TomlConversationRepository;
use crate::toml_divination_repository::TomlDivinationRepository;
use crate::toml_prompt_repository::TomlPromptRepository;
use anyhow::Result;
use bugua_core::config::{AppConfig, StorageBackend};
use bugua_core::conversation::ConversationRepository;
use bugua_core::divination::DivinationRepository;
use bugua_core::prompt::PromptRepository;
use std::sync::Arc;

/// The three stores used by the application.
#[derive(Clone)]
pub struct Stores {
    /// Backend actually in use (after any fallback)
    pub backend: StorageBackend,
    pub records: Arc<dyn DivinationRepository>,
    pub prompts: Arc<dyn PromptRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            records: Arc::new(InMemoryDivinationRepository::new()),
            prompts: Arc::new(InMemoryPromptRepository::new()),
            conversations: Arc::new(InMemoryConversationRepository::new()),
        }
    }

    fn local(paths: &BuguaPaths) -> Result<Self> {
        Ok(Self {
            backend: StorageBackend::Local,
            records: Arc::new(TomlDivinationRepository::new(paths.records_file()?)),
            prompts: Arc::new(TomlPromptRepository::new(paths.prompt_file()?)),
            conversations: Arc::new(TomlConversationRepository::new(
                paths.conversations_dir()?,
            )?),
        })
    }

    fn firestore(client: FirestoreClient) -> Self {
        Self {
            backend: StorageBackend::Firestore,
            records: Arc::new(FirestoreDivinationRepository::new(client.clone())),
            prompts: Arc::new(FirestorePromptRepository::new(client.clone())),
            conversations: Arc::new(FirestoreConversationRepository::new(client)),
        }
    }
}

/// Builds the stores for the configured backend.
///
/// `firestore` without a `[firestore]` section falls back to `local`.
pub fn build_stores(config: &AppConfig, paths: &BuguaPaths) -> Result<Stores> {
    let paths = match &config.storage.data_dir {
        Some(dir) => paths.clone().with_data_dir(dir),
        None => paths.clone(),
    };

    let stores = match (config.storage.backend, config.firestore.as_ref()) {
        (StorageBackend::Memory, _) => Stores::in_memory(),
        (StorageBackend::Local, _) => Stores::local(&paths)?,
        (StorageBackend::Firestore, Some(firestore)) => {
            Stores::firestore(FirestoreClient::new(firestore))
        }
        (StorageBackend::Firestore, None) => {
            tracing::warn!("[Storage] Firestore selected but not configured; using local storage");
            Stores::local(&paths)?
        }
    };

    tracing::info!("[Storage] Using {} backend", stores.backend);
    Ok(stores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugua_core::config::FirestoreConfig;
    use tempfile::TempDir;

    fn config(backend: StorageBackend) -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = backend;
        config
    }

    #[test]
    fn test_firestore_without_config_falls_back_to_local() {
        let dir = TempDir::new().unwrap();
        let stores = build_stores(
            &config(StorageBackend::Firestore),
            &BuguaPaths::with_config_dir(dir.path()),
        )
        .unwrap();
        assert_eq!(stores.backend, StorageBackend::Local);
    }

    #[test]
    fn test_firestore_with_config() {
        let dir = TempDir::new().unwrap();
        let mut config = config(StorageBackend::Firestore);
        config.firestore = Some(FirestoreConfig {
            project_id: "p".into(),
            api_key: "k".into(),
            database: None,
        });
        let stores = build_stores(&config, &BuguaPaths::with_config_dir(dir.path())).unwrap();
        assert_eq!(stores.backend, StorageBackend::Firestore);
    }

    #[tokio::test]
    async fn test_local_backend_honours_data_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = config(StorageBackend::Local);
        config.storage.data_dir = Some(dir.path().join("elsewhere"));

        let stores = build_stores(&config, &BuguaPaths::with_config_dir(dir.path())).unwrap();
        stores.prompts.save_system_prompt("p").await.unwrap();
        assert!(dir.path().join("elsewhere/system_prompt.toml").exists());
    }
}
