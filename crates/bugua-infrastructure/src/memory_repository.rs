//! In-memory repositories for the `memory` backend and for tests.

use anyhow::Result;
use async_trait::async_trait;
use bugua_core::conversation::{Conversation, ConversationRepository};
use bugua_core::divination::{
    ConnectionStatus, DivinationRecord, DivinationRepository, RecordUpdate,
};
use bugua_core::prompt::PromptRepository;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryDivinationRepository {
    records: RwLock<HashMap<String, DivinationRecord>>,
}

impl InMemoryDivinationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl DivinationRepository for InMemoryDivinationRepository {
    async fn find_by_id(&self, key: &str) -> Result<Option<DivinationRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn save(&self, record: &DivinationRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.unique_key.to_string(), record.clone());
        Ok(())
    }

    async fn update(&self, key: &str, update: &RecordUpdate) -> Result<Option<DivinationRecord>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(key).map(|record| {
            update.apply(record);
            record.clone()
        }))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.records.write().await.remove(key);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<DivinationRecord>> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn check_connection(&self) -> ConnectionStatus {
        ConnectionStatus::ok(format!("In-memory store ({} records)", self.len().await))
    }
}

#[derive(Default)]
pub struct InMemoryPromptRepository {
    prompt: RwLock<Option<String>>,
}

impl InMemoryPromptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: RwLock::new(Some(prompt.into())),
        }
    }
}

#[async_trait]
impl PromptRepository for InMemoryPromptRepository {
    async fn load_system_prompt(&self) -> Result<Option<String>> {
        Ok(self.prompt.read().await.clone())
    }

    async fn save_system_prompt(&self, prompt: &str) -> Result<()> {
        *self.prompt.write().await = Some(prompt.to_string());
        Ok(())
    }

    async fn reset_system_prompt(&self) -> Result<()> {
        *self.prompt.write().await = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Conversation>> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn save(&self, conversation: &Conversation) -> Result<()> {
        self.conversations
            .write()
            .await
            .insert(conversation.id.clone(), conversation.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.conversations.write().await.remove(id);
        Ok(())
    }
}
