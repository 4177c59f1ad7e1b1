use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

/// One of the five fixed board positions.
///
/// The position digits are embedded in persisted cache keys and sent to the
/// reading rules; they must never change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Slot {
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

/// Fill order for flip mode: the Nth drawn piece lands in the Nth slot.
pub const FLIP_ORDER: [Slot; 5] = [Slot::Center, Slot::Left, Slot::Right, Slot::Top, Slot::Bottom];

impl Slot {
    pub fn position_digit(self) -> u8 {
        match self {
            Slot::Center => 1,
            Slot::Left => 2,
            Slot::Right => 3,
            Slot::Top => 4,
            Slot::Bottom => 5,
        }
    }

    /// Index into the board's backing array.
    pub(crate) fn index(self) -> usize {
        usize::from(self.position_digit() - 1)
    }

    /// Chinese position glyph shown on the layout.
    pub fn label(self) -> &'static str {
        match self {
            Slot::Center => "中",
            Slot::Left => "左",
            Slot::Right => "右",
            Slot::Top => "上",
            Slot::Bottom => "下",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Slot::Center => "CENTER",
            Slot::Left => "LEFT",
            Slot::Right => "RIGHT",
            Slot::Top => "TOP",
            Slot::Bottom => "BOTTOM",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Slot {
    type Err = String;

    /// Accepts the id (any case), the position digit or the Chinese glyph.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "CENTER" | "1" | "中" => Ok(Slot::Center),
            "LEFT" | "2" | "左" => Ok(Slot::Left),
            "RIGHT" | "3" | "右" => Ok(Slot::Right),
            "TOP" | "4" | "上" => Ok(Slot::Top),
            "BOTTOM" | "5" | "下" => Ok(Slot::Bottom),
            _ => Err(format!("Unknown slot: {}", trimmed)),
        }
    }
}
