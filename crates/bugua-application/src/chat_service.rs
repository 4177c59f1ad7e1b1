//! Follow-up chat about a finished reading.

use bugua_core::conversation::ConversationRepository;
use bugua_core::{BuguaError, CacheKey, ChatMessage, ChatRole, Conversation, DivinationResult};
use bugua_interaction::{Agent, AgentRequest, AgentTurn};
use minijinja::{Environment, context};
use std::sync::Arc;

/// Reply shown when the oracle cannot be reached.
pub const CHAT_FALLBACK_REPLY: &str = "抱歉，神諭暫時無法連結，請稍後再試。";

const CHAT_CONTEXT_TEMPLATE: &str = r#"你是一位精通《象棋卜卦》的智慧長者與大師。
你剛剛為用戶進行了卜卦，結果如下：
- 卦名：{{ result.hexagram_name }}
- 吉凶：{{ result.luck_level }}
- 分析：{{ result.analysis }}
- 建議：{{ result.advice }}

用戶現在對這個結果有疑問或想深入了解。
請以日常口語、親切但富有智慧的方式回答用戶的問題。
不要過於嚴肅，像是一位以此為樂、樂於助人的老朋友或長者。
回答請簡潔有力，切中要害，不要長篇大論。"#;

/// Renders the system context for a chat about `result`.
pub fn chat_context(result: &DivinationResult) -> Result<String, BuguaError> {
    let env = Environment::new();
    env.render_str(CHAT_CONTEXT_TEMPLATE, context! { result => result })
        .map_err(|e| BuguaError::template(format!("chat context: {}", e)))
}

/// One chat, scoped to one round.
pub struct ChatSession {
    conversation: Conversation,
    agent: Arc<dyn Agent>,
    conversations: Arc<dyn ConversationRepository>,
}

impl ChatSession {
    pub fn new(
        unique_key: CacheKey,
        result: DivinationResult,
        agent: Arc<dyn Agent>,
        conversations: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            conversation: Conversation::new(unique_key, result),
            agent,
            conversations,
        }
    }

    /// Continues a stored conversation.
    pub fn resume(
        conversation: Conversation,
        agent: Arc<dyn Agent>,
        conversations: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            conversation,
            agent,
            conversations,
        }
    }

    pub fn id(&self) -> &str {
        &self.conversation.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.conversation.messages
    }

    /// Sends a user message and returns the oracle's reply.
    ///
    /// Blank input is rejected and nothing is recorded. Oracle failures are
    /// answered with [`CHAT_FALLBACK_REPLY`].
    pub async fn send(&mut self, message: &str) -> Result<String, BuguaError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(BuguaError::incomplete("chat message is empty"));
        }

        let history = self.transcript_turns();
        self.conversation.push(ChatMessage::user(message));

        let reply = match self.ask(history, message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("[Chat] Oracle failed in {}: {}", self.conversation.id, e);
                CHAT_FALLBACK_REPLY.to_string()
            }
        };
        self.conversation.push(ChatMessage::model(reply.clone()));

        if let Err(e) = self.conversations.save(&self.conversation).await {
            tracing::warn!(
                "[Chat] Failed to save conversation {}: {:#}",
                self.conversation.id,
                e
            );
        }

        Ok(reply)
    }

    async fn ask(&self, mut turns: Vec<AgentTurn>, message: &str) -> Result<String, BuguaError> {
        let context = chat_context(&self.conversation.divination)?;
        turns.push(AgentTurn::user(message));
        let request = AgentRequest::new(turns).with_system_instruction(context);
        let reply = self
            .agent
            .execute(request)
            .await
            .map_err(|e| BuguaError::agent(e.to_string()))?;
        Ok(reply.trim().to_string())
    }

    fn transcript_turns(&self) -> Vec<AgentTurn> {
        self.conversation
            .messages
            .iter()
            .map(|m| match m.role {
                ChatRole::User => AgentTurn::user(m.text.clone()),
                ChatRole::Model => AgentTurn::model(m.text.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_context_includes_result() {
        let result = DivinationResult {
            luck_level: "小吉".into(),
            hexagram_name: "好朋友格".into(),
            analysis: "兵卒護帥。".into(),
            advice: "穩中求進。".into(),
        };
        let context = chat_context(&result).unwrap();
        assert!(context.contains("- 卦名：好朋友格"));
        assert!(context.contains("- 吉凶：小吉"));
        assert!(context.contains("- 分析：兵卒護帥。"));
        assert!(context.contains("- 建議：穩中求進。"));
    }
}
