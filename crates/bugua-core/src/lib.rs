//! Core domain for BUGUA.
//!
//! Everything in this crate is free of I/O: the piece catalog, the deck shuffler,
//! the five-slot board and its selection state machine, the Gua Code encoder and
//! the cache key builder. Persistence, board capture and the AI oracle are
//! described here only as traits and are implemented in the outer crates.

pub mod board;
pub mod cache_key;
pub mod capture;
pub mod category;
pub mod config;
pub mod conversation;
pub mod deck;
pub mod divination;
pub mod encoding;
pub mod error;
pub mod piece;
pub mod prompt;
pub mod round;

// Re-export common error type
pub use error::BuguaError;

pub use board::{Board, Slot};
pub use cache_key::{CacheKey, build_key};
pub use category::{Category, Gender};
pub use encoding::{GuaCode, encode};
pub use piece::{Piece, PieceColor, PieceKind, PieceType};
pub use round::{GamePhase, InputMode, ReadingRequest, Round, SelectionOutcome};
pub use divination::{DivinationRecord, DivinationResult, RecordUpdate};
pub use conversation::{ChatMessage, ChatRole, Conversation};
