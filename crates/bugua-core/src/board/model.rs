use super::slot::Slot;
use crate::piece::Piece;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// A total mapping from the five slots to an optional piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    slots: [Option<Piece>; 5],
}

impl Board {
    /// An empty board: every slot unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&Piece> {
        self.slots[slot.index()].as_ref()
    }

    pub fn is_filled(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    /// Puts `piece` in `slot`, returning whatever was there before.
    pub fn place(&mut self, slot: Slot, piece: Piece) -> Option<Piece> {
        self.slots[slot.index()].replace(piece)
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True when all five slots hold a piece.
    pub fn is_complete(&self) -> bool {
        self.filled_count() == self.slots.len()
    }

    /// Slots that are still empty, in position-digit order.
    pub fn empty_slots(&self) -> Vec<Slot> {
        Slot::iter().filter(|s| !self.is_filled(*s)).collect()
    }

    /// Iterates every slot with its (optional) piece, in position-digit order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, Option<&Piece>)> + '_ {
        Slot::iter().map(move |slot| (slot, self.get(slot)))
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.slots.iter().flatten()
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{PieceColor, PieceKind, PieceType};

    fn soldier() -> Piece {
        Piece::mint(PieceType::new(PieceKind::Soldier, PieceColor::Red))
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.filled_count(), 0);
        assert!(!board.is_complete());
        assert_eq!(board.empty_slots().len(), 5);
    }

    #[test]
    fn test_place_replaces_and_returns_previous() {
        let mut board = Board::new();
        let first = soldier();
        assert!(board.place(Slot::Top, first.clone()).is_none());
        let previous = board.place(Slot::Top, soldier());
        assert_eq!(previous, Some(first));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut board = Board::new();
        board.place(Slot::Center, soldier());
        board.clear();
        assert_eq!(board, Board::new());
    }
}
