//! Conversation DTOs.

use bugua_core::divination::DivinationResult;
use bugua_core::{CacheKey, ChatMessage, ChatRole, Conversation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    /// `user` or `model`
    pub role: String,
    pub text: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDto {
    pub id: String,
    pub unique_key: String,
    pub luck_level: String,
    pub hexagram_name: String,
    pub analysis: String,
    pub advice: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub messages: Vec<ChatMessageDto>,
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Model => "model",
    }
}

fn parse_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

impl From<&Conversation> for ConversationDto {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.clone(),
            unique_key: conversation.unique_key.to_string(),
            luck_level: conversation.divination.luck_level.clone(),
            hexagram_name: conversation.divination.hexagram_name.clone(),
            analysis: conversation.divination.analysis.clone(),
            advice: conversation.divination.advice.clone(),
            created_at: conversation.created_at.to_rfc3339(),
            updated_at: conversation.updated_at.to_rfc3339(),
            messages: conversation
                .messages
                .iter()
                .map(|m| ChatMessageDto {
                    role: role_name(m.role).to_string(),
                    text: m.text.clone(),
                    timestamp: m.timestamp.to_rfc3339(),
                })
                .collect(),
        }
    }
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        let messages = dto
            .messages
            .into_iter()
            .map(|m| ChatMessage {
                // Anything that is not the querent was said by the oracle.
                role: if m.role == "user" {
                    ChatRole::User
                } else {
                    ChatRole::Model
                },
                timestamp: parse_time(&m.timestamp),
                text: m.text,
            })
            .collect();

        Conversation {
            id: dto.id,
            unique_key: CacheKey::from_stored(dto.unique_key),
            divination: DivinationResult {
                luck_level: dto.luck_level,
                hexagram_name: dto.hexagram_name,
                analysis: dto.analysis,
                advice: dto.advice,
            },
            messages,
            created_at: parse_time(&dto.created_at),
            updated_at: parse_time(&dto.updated_at),
        }
    }
}

/// Contents of `system_prompt.toml`; mirrors the remote `system_settings/prompt` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDto {
    pub value: String,
}
