mod common;

use bugua_application::{CHAT_FALLBACK_REPLY, ChatSession};
use bugua_core::conversation::ConversationRepository;
use bugua_core::{CacheKey, ChatRole, DivinationResult};
use bugua_infrastructure::InMemoryConversationRepository;
use bugua_interaction::{AgentError, AgentRole};
use common::{BrokenConversations, ScriptedAgent};
use std::sync::Arc;

fn reading() -> DivinationResult {
    DivinationResult {
        luck_level: "中吉".into(),
        hexagram_name: "車馬同心".into(),
        analysis: "車馬相輔。".into(),
        advice: "與人合作。".into(),
    }
}

fn session(agent: Arc<ScriptedAgent>, store: Arc<InMemoryConversationRepository>) -> ChatSession {
    ChatSession::new(
        CacheKey::from_stored("111-225-316-427-527_CAREER_MALE"),
        reading(),
        agent,
        store,
    )
}

#[tokio::test]
async fn test_exchange_is_recorded_and_persisted() {
    let agent = Arc::new(ScriptedAgent::new(vec![
        Ok("宜守不宜攻。".into()),
        Ok(" 三個月內。 ".into()),
    ]));
    let store = Arc::new(InMemoryConversationRepository::new());
    let mut chat = session(agent.clone(), store.clone());

    assert_eq!(chat.send("我該換工作嗎？").await.unwrap(), "宜守不宜攻。");
    assert_eq!(chat.send("多久？").await.unwrap(), "三個月內。");

    let roles: Vec<ChatRole> = chat.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [ChatRole::User, ChatRole::Model, ChatRole::User, ChatRole::Model]
    );

    // Second call carries the prior transcript plus the new message.
    let request = agent.request(1);
    assert_eq!(request.turns.len(), 3);
    assert_eq!(request.turns[1].role, AgentRole::Model);
    assert_eq!(request.turns[2].text, "多久？");
    assert!(request.system_instruction.unwrap().contains("車馬同心"));
    assert!(request.response_schema.is_none());

    let stored = store.find_by_id(chat.id()).await.unwrap().unwrap();
    assert_eq!(stored.messages.len(), 4);
    assert_eq!(stored.unique_key.as_str(), "111-225-316-427-527_CAREER_MALE");
}

#[tokio::test]
async fn test_blank_message_is_not_sent() {
    let agent = Arc::new(ScriptedAgent::new(vec![]));
    let store = Arc::new(InMemoryConversationRepository::new());
    let mut chat = session(agent.clone(), store.clone());

    let err = chat.send("   ").await.unwrap_err();

    assert!(err.is_incomplete());
    assert_eq!(agent.calls(), 0);
    assert!(chat.messages().is_empty());
    assert!(store.find_by_id(chat.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_oracle_failure_uses_fallback_reply() {
    let agent = Arc::new(ScriptedAgent::new(vec![Err(AgentError::ExecutionFailed(
        "offline".into(),
    ))]));
    let store = Arc::new(InMemoryConversationRepository::new());
    let mut chat = session(agent, store);

    let reply = chat.send("還好嗎？").await.unwrap();

    assert_eq!(reply, CHAT_FALLBACK_REPLY);
    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[1].text, CHAT_FALLBACK_REPLY);
}

#[tokio::test]
async fn test_failed_save_still_returns_reply() {
    let agent = Arc::new(ScriptedAgent::new(vec![Ok("守成為上。".into())]));
    let mut chat = ChatSession::new(
        CacheKey::from_stored("111-225-316-427-527_CAREER_MALE"),
        reading(),
        agent.clone(),
        Arc::new(BrokenConversations),
    );

    let reply = chat.send("今年適合創業嗎？").await.unwrap();

    assert_eq!(reply, "守成為上。");
    assert_eq!(agent.calls(), 1);
    let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["今年適合創業嗎？", "守成為上。"]);
    assert_eq!(chat.conversation().messages.len(), 2);
}
