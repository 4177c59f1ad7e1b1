//! Storage, configuration and capture implementations for bugua.

pub mod config_service;
pub mod dto;
pub mod firestore;
pub mod memory_repository;
pub mod paths;
pub mod storage;
pub mod store_factory;
pub mod svg_capture;
pub mod toml_conversation_repository;
pub mod toml_divination_repository;
pub mod toml_prompt_repository;

pub use crate::config_service::ConfigService;
pub use crate::memory_repository::{
    InMemoryConversationRepository, InMemoryDivinationRepository, InMemoryPromptRepository,
};
pub use crate::paths::BuguaPaths;
pub use crate::store_factory::{Stores, build_stores};
pub use crate::svg_capture::SvgBoardCapture;
pub use crate::toml_conversation_repository::TomlConversationRepository;
pub use crate::toml_divination_repository::TomlDivinationRepository;
pub use crate::toml_prompt_repository::TomlPromptRepository;
