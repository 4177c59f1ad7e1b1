//! Piece domain model.

use serde::{Deserialize, Serialize};
use strum::EnumIter;
use uuid::Uuid;

/// The two sides of a xiangqi set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceColor {
    Red,
    Black,
}

impl PieceColor {
    /// Digit used in the Gua Code: 1 for red, 2 for black.
    pub fn digit(self) -> u8 {
        match self {
            PieceColor::Red => 1,
            PieceColor::Black => 2,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            PieceColor::Red => "RED",
            PieceColor::Black => "BLACK",
        }
    }
}

/// The seven piece kinds, ordered from highest to lowest rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Chariot,
    Horse,
    Cannon,
    Soldier,
}

impl PieceKind {
    /// Rank digit 1..=7 as embedded in the Gua Code.
    pub fn rank(self) -> u8 {
        match self {
            PieceKind::General => 1,
            PieceKind::Advisor => 2,
            PieceKind::Elephant => 3,
            PieceKind::Chariot => 4,
            PieceKind::Horse => 5,
            PieceKind::Cannon => 6,
            PieceKind::Soldier => 7,
        }
    }

    /// Score weight used by the reading rules.
    pub fn weight(self) -> u32 {
        match self {
            PieceKind::General => 80,
            PieceKind::Advisor => 60,
            PieceKind::Elephant => 40,
            PieceKind::Chariot => 30,
            PieceKind::Horse => 20,
            PieceKind::Cannon => 15,
            PieceKind::Soldier => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::General => "General",
            PieceKind::Advisor => "Advisor",
            PieceKind::Elephant => "Elephant",
            PieceKind::Chariot => "Chariot",
            PieceKind::Horse => "Horse",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        }
    }

    /// Display glyph for the given side.
    pub fn label(self, color: PieceColor) -> &'static str {
        match (self, color) {
            (PieceKind::General, PieceColor::Red) => "帥",
            (PieceKind::General, PieceColor::Black) => "將",
            (PieceKind::Advisor, PieceColor::Red) => "仕",
            (PieceKind::Advisor, PieceColor::Black) => "士",
            (PieceKind::Elephant, PieceColor::Red) => "相",
            (PieceKind::Elephant, PieceColor::Black) => "象",
            (PieceKind::Chariot, PieceColor::Red) => "俥",
            (PieceKind::Chariot, PieceColor::Black) => "車",
            (PieceKind::Horse, PieceColor::Red) => "傌",
            (PieceKind::Horse, PieceColor::Black) => "馬",
            (PieceKind::Cannon, PieceColor::Red) => "炮",
            (PieceKind::Cannon, PieceColor::Black) => "包",
            (PieceKind::Soldier, PieceColor::Red) => "兵",
            (PieceKind::Soldier, PieceColor::Black) => "卒",
        }
    }

    /// How many pieces of this kind one side holds.
    pub fn count_per_side(self) -> usize {
        match self {
            PieceKind::General => 1,
            PieceKind::Soldier => 5,
            _ => 2,
        }
    }
}

/// A catalog entry: one of the 14 distinct labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceType {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl PieceType {
    pub const fn new(kind: PieceKind, color: PieceColor) -> Self {
        Self { kind, color }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label(self.color)
    }
}

/// A single physical piece on the table or on the board.
///
/// Pieces are immutable once created. `rank` is the 1..=7 ordinal of its kind;
/// use [`Piece::weight`] for the score value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Unique token for this piece instance
    pub id: String,
    /// Display glyph (e.g. 帥, 卒)
    pub label: String,
    pub color: PieceColor,
    /// Ordinal 1..=7
    pub rank: u8,
    /// English name of the kind
    pub name: String,
}

impl Piece {
    pub fn new(id: impl Into<String>, piece_type: PieceType) -> Self {
        Self {
            id: id.into(),
            label: piece_type.label().to_string(),
            color: piece_type.color,
            rank: piece_type.kind.rank(),
            name: piece_type.kind.name().to_string(),
        }
    }

    /// Mints a piece with a fresh UUID, used for manual placements so the same
    /// catalog entry can be placed twice without id collisions.
    pub fn mint(piece_type: PieceType) -> Self {
        Self::new(Uuid::new_v4().to_string(), piece_type)
    }

    /// The catalog entry this piece was made from, if its label is known.
    pub fn piece_type(&self) -> Option<PieceType> {
        super::catalog::piece_type_for_label(&self.label)
    }

    pub fn weight(&self) -> u32 {
        self.piece_type().map(|t| t.kind.weight()).unwrap_or(10)
    }
}
