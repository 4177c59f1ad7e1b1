//! Firestore-backed repositories.

use super::client::FirestoreClient;
use super::value::encode_fields;
use crate::dto::{ConversationDto, DivinationRecordDto, PromptDto};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bugua_core::conversation::{Conversation, ConversationRepository};
use bugua_core::divination::{
    ConnectionStatus, DivinationRecord, DivinationRepository, RecordUpdate,
};
use bugua_core::prompt::PromptRepository;
use serde_json::Value;

pub const DIVINATION_RESULTS: &str = "divination_results";
pub const SYSTEM_SETTINGS: &str = "system_settings";
pub const CONVERSATIONS: &str = "conversations";
const PROMPT_DOCUMENT: &str = "prompt";
const CONNECTION_PROBE_DOCUMENT: &str = "_connection_test_";

/// Readings in the `divination_results` collection; document id = identity key.
pub struct FirestoreDivinationRepository {
    client: FirestoreClient,
}

impl FirestoreDivinationRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DivinationRepository for FirestoreDivinationRepository {
    async fn find_by_id(&self, key: &str) -> Result<Option<DivinationRecord>> {
        let dto: Option<DivinationRecordDto> = self
            .client
            .get(DIVINATION_RESULTS, key)
            .await
            .with_context(|| format!("Failed to read record {}", key))?;
        if dto.is_some() {
            tracing::debug!("[Firestore] Cache hit for {}", key);
        }
        dto.map(DivinationRecord::try_from).transpose()
    }

    async fn save(&self, record: &DivinationRecord) -> Result<()> {
        let dto = DivinationRecordDto::from(record);
        self.client
            .set(DIVINATION_RESULTS, &dto.unique_key, &dto)
            .await
            .with_context(|| format!("Failed to save record {}", dto.unique_key))?;
        tracing::info!("[Firestore] Result saved for {}", dto.unique_key);
        Ok(())
    }

    async fn update(&self, key: &str, update: &RecordUpdate) -> Result<Option<DivinationRecord>> {
        if update.is_empty() {
            tracing::debug!("[Firestore] No valid updates for {}, skipping", key);
            return self.find_by_id(key).await;
        }

        let field_paths = update.field_names();
        let Value::Object(map) = serde_json::to_value(update)? else {
            anyhow::bail!("record update did not serialize to an object");
        };
        let provided = map
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .collect::<serde_json::Map<_, _>>();

        let dto: Option<DivinationRecordDto> = self
            .client
            .update_fields(DIVINATION_RESULTS, key, encode_fields(&provided), &field_paths)
            .await
            .with_context(|| format!("Failed to update record {}", key))?;
        tracing::info!("[Firestore] Record updated: {} ({})", key, field_paths.join(", "));
        dto.map(DivinationRecord::try_from).transpose()
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete(DIVINATION_RESULTS, key)
            .await
            .with_context(|| format!("Failed to delete record {}", key))?;
        tracing::info!("[Firestore] Record deleted: {}", key);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<DivinationRecord>> {
        let dtos: Vec<DivinationRecordDto> = self
            .client
            .list(DIVINATION_RESULTS, Some("created_at desc"))
            .await
            .context("Failed to list records")?;

        let mut records: Vec<DivinationRecord> = dtos
            .into_iter()
            .filter_map(|dto| {
                let key = dto.unique_key.clone();
                DivinationRecord::try_from(dto)
                    .map_err(|e| tracing::warn!("[Firestore] Skipping unreadable record {}: {}", key, e))
                    .ok()
            })
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn check_connection(&self) -> ConnectionStatus {
        // Reading a document that never exists exercises auth and rules.
        match self
            .client
            .get::<Value>(SYSTEM_SETTINGS, CONNECTION_PROBE_DOCUMENT)
            .await
        {
            Ok(_) => ConnectionStatus::ok("Connected to Firestore"),
            Err(e) if e.is_permission_denied() => {
                ConnectionStatus::failed("Permission Denied (Check Rules)")
            }
            Err(e) => ConnectionStatus::failed(e.to_string()),
        }
    }
}

/// Template in `system_settings/prompt`, field `value`.
pub struct FirestorePromptRepository {
    client: FirestoreClient,
}

impl FirestorePromptRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PromptRepository for FirestorePromptRepository {
    async fn load_system_prompt(&self) -> Result<Option<String>> {
        let dto: Option<PromptDto> = self
            .client
            .get(SYSTEM_SETTINGS, PROMPT_DOCUMENT)
            .await
            .context("Failed to read system prompt")?;
        Ok(dto.map(|d| d.value).filter(|v| !v.trim().is_empty()))
    }

    async fn save_system_prompt(&self, prompt: &str) -> Result<()> {
        self.client
            .set(
                SYSTEM_SETTINGS,
                PROMPT_DOCUMENT,
                &PromptDto {
                    value: prompt.to_string(),
                },
            )
            .await
            .context("Failed to save system prompt")?;
        tracing::info!("[Firestore] System prompt saved");
        Ok(())
    }

    async fn reset_system_prompt(&self) -> Result<()> {
        self.client
            .delete(SYSTEM_SETTINGS, PROMPT_DOCUMENT)
            .await
            .context("Failed to reset system prompt")?;
        Ok(())
    }
}

/// Chat transcripts in the `conversations` collection.
pub struct FirestoreConversationRepository {
    client: FirestoreClient,
}

impl FirestoreConversationRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConversationRepository for FirestoreConversationRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Conversation>> {
        let dto: Option<ConversationDto> = self
            .client
            .get(CONVERSATIONS, id)
            .await
            .with_context(|| format!("Failed to read conversation {}", id))?;
        Ok(dto.map(Conversation::from))
    }

    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let dto = ConversationDto::from(conversation);
        self.client
            .set(CONVERSATIONS, &conversation.id, &dto)
            .await
            .with_context(|| format!("Failed to save conversation {}", conversation.id))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(CONVERSATIONS, id)
            .await
            .with_context(|| format!("Failed to delete conversation {}", id))?;
        Ok(())
    }
}
