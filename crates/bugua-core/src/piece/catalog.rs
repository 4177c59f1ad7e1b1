//! The static 32-piece catalog.

use super::model::{Piece, PieceColor, PieceKind, PieceType};
use strum::IntoEnumIterator;

/// Total number of pieces in a full set.
pub const DECK_SIZE: usize = 32;

/// Rank digit used when a label is not in the catalog.
pub const FALLBACK_RANK: u8 = 7;

/// All 14 catalog entries, red first, each side ordered General → Soldier.
pub fn piece_types() -> Vec<PieceType> {
    PieceColor::iter()
        .flat_map(|color| PieceKind::iter().map(move |kind| PieceType::new(kind, color)))
        .collect()
}

/// Builds the unshuffled deck.
///
/// Ids have the form `RED_Soldier_3`, numbered from 1 within each type.
pub fn initial_deck() -> Vec<Piece> {
    piece_types()
        .into_iter()
        .flat_map(|piece_type| {
            (1..=piece_type.kind.count_per_side()).map(move |n| {
                let id = format!("{}_{}_{}", piece_type.color.id(), piece_type.kind.name(), n);
                Piece::new(id, piece_type)
            })
        })
        .collect()
}

/// Looks up the catalog entry for a display glyph.
pub fn piece_type_for_label(label: &str) -> Option<PieceType> {
    piece_types().into_iter().find(|t| t.label() == label)
}

/// Rank digit for a display glyph. Unknown labels map to the lowest rank.
pub fn rank_digit_for_label(label: &str) -> u8 {
    piece_type_for_label(label)
        .map(|t| t.kind.rank())
        .unwrap_or(FALLBACK_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_deck_has_32_pieces_and_14_labels() {
        let deck = initial_deck();
        assert_eq!(deck.len(), DECK_SIZE);

        let labels: HashSet<_> = deck.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels.len(), 14);

        let ids: HashSet<_> = deck.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), DECK_SIZE, "deck ids must be unique");
    }

    #[test]
    fn test_multiplicities_favour_low_ranks() {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let deck = initial_deck();
        for piece in deck.iter() {
            *counts.entry(piece.label.as_str()).or_default() += 1;
        }
        assert_eq!(counts["帥"], 1);
        assert_eq!(counts["將"], 1);
        assert_eq!(counts["炮"], 2);
        assert_eq!(counts["兵"], 5);
        assert_eq!(counts["卒"], 5);
    }

    #[test]
    fn test_both_colors_share_rank_digit() {
        assert_eq!(rank_digit_for_label("帥"), 1);
        assert_eq!(rank_digit_for_label("將"), 1);
        assert_eq!(rank_digit_for_label("傌"), 5);
        assert_eq!(rank_digit_for_label("馬"), 5);
        assert_eq!(rank_digit_for_label("包"), 6);
    }

    #[test]
    fn test_unknown_label_falls_back_to_lowest_rank() {
        assert_eq!(rank_digit_for_label("王"), 7);
        assert_eq!(rank_digit_for_label(""), 7);
    }

    #[test]
    fn test_deck_ids_follow_type_naming() {
        let deck = initial_deck();
        assert_eq!(deck[0].id, "RED_General_1");
        assert!(deck.iter().any(|p| p.id == "BLACK_Soldier_5"));
    }
}
