//! Divination domain module.
//!
//! - `model`: `DivinationResult`, the persisted `DivinationRecord` and partial `RecordUpdate`s
//! - `repository`: `DivinationRepository` trait for the record store

mod model;
mod repository;

pub use model::{
    BUSY_LUCK_LEVEL, DivinationRecord, DivinationResult, FALLBACK_HEXAGRAM_NAME,
    MISCONFIGURED_LUCK_LEVEL, RecordUpdate,
};
pub use repository::{ConnectionStatus, DivinationRepository};
