//! The oracle seam.
//!
//! An [`Agent`] takes a system instruction, a transcript of turns and an
//! optional JSON response schema, and returns the model's raw text.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Agent process error (status {status_code:?}): {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    #[error("Failed to parse agent output: {0}")]
    ParseError(String),

    #[error("{0}")]
    Other(String),
}

impl AgentError {
    pub fn process_error_with_retry_after(
        status_code: u16,
        message: impl Into<String>,
        is_retryable: bool,
        retry_after: Duration,
    ) -> Self {
        AgentError::ProcessError {
            status_code: Some(status_code),
            message: message.into(),
            is_retryable,
            retry_after: Some(retry_after),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::ProcessError {
                is_retryable: true,
                ..
            }
        )
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AgentError::ProcessError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Speaker of one turn, in the model's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    User,
    Model,
}

impl AgentRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::User => "user",
            AgentRole::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTurn {
    pub role: AgentRole,
    pub text: String,
}

impl AgentTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: AgentRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: AgentRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRequest {
    pub system_instruction: Option<String>,
    pub turns: Vec<AgentTurn>,
    /// When set, the model is asked for JSON matching this schema.
    pub response_schema: Option<Value>,
}

impl AgentRequest {
    pub fn new(turns: Vec<AgentTurn>) -> Self {
        Self {
            turns,
            ..Default::default()
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

#[async_trait]
pub trait Agent: Send + Sync {
    /// Short description used in logs and diagnostics.
    fn expertise(&self) -> &str;

    async fn execute(&self, request: AgentRequest) -> Result<String, AgentError>;
}

/// Agent used when no API key is configured. Every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableAgent {
    reason: String,
}

impl UnavailableAgent {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Agent for UnavailableAgent {
    fn expertise(&self) -> &str {
        "unavailable"
    }

    async fn execute(&self, _request: AgentRequest) -> Result<String, AgentError> {
        Err(AgentError::ExecutionFailed(self.reason.clone()))
    }
}
