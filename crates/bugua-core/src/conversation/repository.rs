use super::model::Conversation;
use anyhow::Result;
use async_trait::async_trait;

/// Persistence for chat transcripts.
///
/// Saving is best-effort from the chat's point of view: a failed save is
/// logged by the caller and the conversation continues.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Conversation>>;

    /// Saves the full transcript, replacing any earlier version.
    async fn save(&self, conversation: &Conversation) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}
