//! TOML-based ConversationRepository implementation.

use crate::dto::ConversationDto;
use crate::storage::AtomicTomlFile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bugua_core::conversation::{Conversation, ConversationRepository};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each conversation as its own TOML file.
///
/// ```text
/// conversations/
/// ├── 5b0c...e1.toml
/// └── 9f21...07.toml
/// ```
pub struct TomlConversationRepository {
    base_dir: PathBuf,
}

impl TomlConversationRepository {
    /// Creates the repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).context("Failed to create conversations directory")?;
        Ok(Self { base_dir })
    }

    fn file(&self, id: &str) -> AtomicTomlFile<ConversationDto> {
        AtomicTomlFile::new(self.base_dir.join(format!("{}.toml", id)))
    }
}

#[async_trait]
impl ConversationRepository for TomlConversationRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Conversation>> {
        let dto = self
            .file(id)
            .load()
            .with_context(|| format!("Failed to read conversation {}", id))?;
        Ok(dto.map(Conversation::from))
    }

    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let dto = ConversationDto::from(conversation);
        self.file(&conversation.id)
            .save(&dto)
            .with_context(|| format!("Failed to write conversation {}", conversation.id))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.file(id)
            .remove()
            .with_context(|| format!("Failed to delete conversation {}", id))?;
        Ok(())
    }
}
