//! Question categories and querent genders.
//!
//! Both are small closed enumerations whose ids are uppercase ASCII letters
//! only. The cache key builder relies on that to join them with `_` safely.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Career,
    Love,
    Health,
    Wealth,
    General,
}

impl Category {
    pub fn id(self) -> &'static str {
        match self {
            Category::Career => "CAREER",
            Category::Love => "LOVE",
            Category::Health => "HEALTH",
            Category::Wealth => "WEALTH",
            Category::General => "GENERAL",
        }
    }

    /// Label shown to the player and substituted into the reading prompt.
    pub fn label(self) -> &'static str {
        match self {
            Category::Career => "事業 / 工作",
            Category::Love => "感情 / 婚姻",
            Category::Health => "健康 / 平安",
            Category::Wealth => "財運 / 投資",
            Category::General => "綜合運勢",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Career => "💼",
            Category::Love => "❤️",
            Category::Health => "🌿",
            Category::Wealth => "💰",
            Category::General => "🔮",
        }
    }

    pub fn all() -> Vec<Category> {
        Category::iter().collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::iter()
            .find(|c| c.id().eq_ignore_ascii_case(needle) || c.label() == needle)
            .ok_or_else(|| format!("Unknown category: {}", needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn id(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Gender::iter()
            .find(|g| g.id().eq_ignore_ascii_case(needle) || g.label() == needle)
            .ok_or_else(|| format!("Unknown gender: {}", needle))
    }
}
