//! Piece domain module.
//!
//! - `model`: `Piece`, `PieceColor`, `PieceKind`, `PieceType`
//! - `catalog`: the fixed 32-piece set and the label → rank lookup

mod catalog;
mod model;

pub use catalog::{
    DECK_SIZE, FALLBACK_RANK, initial_deck, piece_type_for_label, piece_types,
    rank_digit_for_label,
};
pub use model::{Piece, PieceColor, PieceKind, PieceType};
