//! Cache key derivation.
//!
//! `build_key` is a pure function of (code, category, gender). Identical
//! triples always address the same record, which is what bounds the oracle to
//! one call per distinct board and question.

use crate::category::{Category, Gender};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Separator that replaces whitespace inside the code.
pub const CODE_SEPARATOR: &str = "-";
/// Separator between code, category and gender.
pub const FIELD_SEPARATOR: &str = "_";

/// Identity key of a persisted reading, e.g. `117-227-313-426-521_CAREER_MALE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wraps a key read back from storage. New keys come from [`build_key`].
    pub fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn build_key(code: &str, category: Category, gender: Option<Gender>) -> CacheKey {
    let code = WHITESPACE.replace_all(code.trim(), CODE_SEPARATOR);
    let mut key = format!("{}{}{}", code, FIELD_SEPARATOR, category.id());
    if let Some(gender) = gender {
        key.push_str(FIELD_SEPARATOR);
        key.push_str(gender.id());
    }
    CacheKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    const CODE: &str = "117 227 317 427 527";

    #[test]
    fn test_key_format() {
        assert_eq!(
            build_key(CODE, Category::Career, None).as_str(),
            "117-227-317-427-527_CAREER"
        );
        assert_eq!(
            build_key(CODE, Category::Love, Some(Gender::Female)).as_str(),
            "117-227-317-427-527_LOVE_FEMALE"
        );
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(
            build_key("117  227\t317", Category::General, None),
            build_key("117 227 317", Category::General, None)
        );
    }

    #[test]
    fn test_pure_and_collision_free_over_closed_alphabet() {
        let codes = [CODE, "117 227 317 427 526", "217 127 317 427 527"];
        let genders = [None, Some(Gender::Male), Some(Gender::Female)];

        let mut seen = HashSet::new();
        let mut total = 0;
        for code in codes {
            for category in Category::iter() {
                for gender in genders {
                    let key = build_key(code, category, gender);
                    assert_eq!(key, build_key(code, category, gender));
                    seen.insert(key);
                    total += 1;
                }
            }
        }
        assert_eq!(seen.len(), total);
    }
}
