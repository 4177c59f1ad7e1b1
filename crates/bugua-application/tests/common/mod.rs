#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bugua_core::capture::BoardCapture;
use bugua_core::conversation::ConversationRepository;
use bugua_core::divination::{ConnectionStatus, DivinationRepository};
use bugua_core::{
    Board, Category, Conversation, DivinationRecord, Gender, InputMode, RecordUpdate, Round,
};
use bugua_interaction::{Agent, AgentError, AgentRequest};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const GOOD_READING: &str = r#"{
    "verdict": "小吉",
    "explanation": "兵卒護帥，小有所成。",
    "advice": "穩中求進。",
    "pattern_tags": ["好朋友格"],
    "scores": {"gain": 10, "loss": 5, "net": 5}
}"#;

/// Agent that replays scripted answers and records every request.
#[derive(Default)]
pub struct ScriptedAgent {
    replies: Mutex<VecDeque<Result<String, AgentError>>>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedAgent {
    pub fn new(replies: Vec<Result<String, AgentError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> AgentRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn expertise(&self) -> &str {
        "scripted"
    }

    async fn execute(&self, request: AgentRequest) -> Result<String, AgentError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::ExecutionFailed("script exhausted".into())))
    }
}

/// Capture that always returns the same image.
pub struct FixedCapture(pub String);

#[async_trait]
impl BoardCapture for FixedCapture {
    async fn capture(&self, _board: &Board) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

pub struct FailingCapture;

#[async_trait]
impl BoardCapture for FailingCapture {
    async fn capture(&self, _board: &Board) -> Result<Option<String>> {
        Err(anyhow!("render target detached"))
    }
}

/// Record store whose every operation fails.
pub struct BrokenRecords;

#[async_trait]
impl DivinationRepository for BrokenRecords {
    async fn find_by_id(&self, _key: &str) -> Result<Option<DivinationRecord>> {
        Err(anyhow!("store offline"))
    }

    async fn save(&self, _record: &DivinationRecord) -> Result<()> {
        Err(anyhow!("store offline"))
    }

    async fn update(&self, _key: &str, _update: &RecordUpdate) -> Result<Option<DivinationRecord>> {
        Err(anyhow!("store offline"))
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Err(anyhow!("store offline"))
    }

    async fn list_all(&self) -> Result<Vec<DivinationRecord>> {
        Err(anyhow!("store offline"))
    }

    async fn check_connection(&self) -> ConnectionStatus {
        ConnectionStatus::failed("store offline")
    }
}

/// Conversation store whose every operation fails.
pub struct BrokenConversations;

#[async_trait]
impl ConversationRepository for BrokenConversations {
    async fn find_by_id(&self, _id: &str) -> Result<Option<Conversation>> {
        Err(anyhow!("disk full"))
    }

    async fn save(&self, _conversation: &Conversation) -> Result<()> {
        Err(anyhow!("disk full"))
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        Err(anyhow!("disk full"))
    }
}

/// A flip round waiting in `CATEGORY_SELECT` with category and gender chosen.
pub fn ready_round(seed: u64) -> Round {
    let mut round = Round::new(InputMode::Flip);
    round.shuffle_from_seed(seed);
    for index in [3, 14, 15, 9, 26] {
        round.select_at(index);
    }
    assert!(round.choose_category(Category::Career));
    assert!(round.choose_gender(Gender::Male));
    round
}
