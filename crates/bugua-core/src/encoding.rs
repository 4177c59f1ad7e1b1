//! Gua Code encoding.
//!
//! A complete board is projected into five 3-digit tokens
//! `position-digit ++ color-digit ++ rank-digit`, joined by single spaces.
//! The emission order is part of every persisted cache key: changing
//! [`EMISSION_ORDER`] orphans all existing records.

use crate::board::{Board, Slot};
use crate::error::{BuguaError, Result};
use crate::piece::{Piece, rank_digit_for_label};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical slot emission order (CENTER first, position digits ascending).
pub const EMISSION_ORDER: [Slot; 5] = [Slot::Center, Slot::Left, Slot::Right, Slot::Top, Slot::Bottom];

/// The canonical textual encoding of a complete board, e.g. `117 227 315 426 521`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuaCode(String);

impl GuaCode {
    /// Wraps a code read back from storage. New codes come from [`encode`].
    pub fn from_stored(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ')
    }
}

impl fmt::Display for GuaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token for a single piece sitting in `slot`.
pub fn piece_token(piece: &Piece, slot: Slot) -> String {
    format!(
        "{}{}{}",
        slot.position_digit(),
        piece.color.digit(),
        rank_digit_for_label(&piece.label)
    )
}

/// Encodes a complete board.
///
/// # Errors
///
/// Returns [`BuguaError::Incomplete`] if any slot is empty; a partial code is
/// never produced.
pub fn encode(board: &Board) -> Result<GuaCode> {
    let tokens = EMISSION_ORDER
        .iter()
        .map(|&slot| {
            board
                .get(slot)
                .map(|piece| piece_token(piece, slot))
                .ok_or_else(|| BuguaError::incomplete(format!("slot {} is empty", slot)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GuaCode(tokens.join(" ")))
}
