//! Conversation domain module.
//!
//! - `model`: `ChatRole`, `ChatMessage` and the `Conversation` transcript
//! - `repository`: `ConversationRepository` trait

mod model;
mod repository;

pub use model::{ChatMessage, ChatRole, Conversation};
pub use repository::ConversationRepository;
