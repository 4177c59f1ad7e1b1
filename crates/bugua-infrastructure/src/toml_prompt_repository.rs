//! TOML-based PromptRepository implementation.

use crate::dto::PromptDto;
use crate::storage::AtomicTomlFile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bugua_core::prompt::PromptRepository;
use std::path::PathBuf;

/// Keeps the reading template in a single `value = "..."` TOML file.
pub struct TomlPromptRepository {
    file: AtomicTomlFile<PromptDto>,
}

impl TomlPromptRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path.into()),
        }
    }
}

#[async_trait]
impl PromptRepository for TomlPromptRepository {
    async fn load_system_prompt(&self) -> Result<Option<String>> {
        let dto = self.file.load().context("Failed to read system prompt")?;
        Ok(dto.map(|d| d.value).filter(|v| !v.trim().is_empty()))
    }

    async fn save_system_prompt(&self, prompt: &str) -> Result<()> {
        self.file
            .save(&PromptDto {
                value: prompt.to_string(),
            })
            .context("Failed to write system prompt")?;
        tracing::info!("[Prompt] System prompt saved ({} chars)", prompt.chars().count());
        Ok(())
    }

    async fn reset_system_prompt(&self) -> Result<()> {
        self.file.remove().context("Failed to remove system prompt")?;
        tracing::info!("[Prompt] System prompt reset to default");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_load_reset() {
        let dir = TempDir::new().unwrap();
        let repo = TomlPromptRepository::new(dir.path().join("system_prompt.toml"));

        assert!(repo.load_system_prompt().await.unwrap().is_none());

        let prompt = "卦象 {{USER_INPUT_CODE}}\n類別 {{USER_INPUT_CATEGORY}}";
        repo.save_system_prompt(prompt).await.unwrap();
        assert_eq!(repo.load_system_prompt().await.unwrap().as_deref(), Some(prompt));

        repo.reset_system_prompt().await.unwrap();
        assert!(repo.load_system_prompt().await.unwrap().is_none());
    }
}
