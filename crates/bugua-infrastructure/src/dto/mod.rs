//! Persistence DTOs.
//!
//! Domain types never hit storage directly; each store converts through these
//! flat, string-typed shapes.

mod conversation;
mod record;

pub use conversation::{ChatMessageDto, ConversationDto, PromptDto};
pub use record::{DivinationRecordDto, RECORD_STORE_VERSION, RecordStoreDto};
