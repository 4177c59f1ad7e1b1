//! Reading results and their persisted form.

use crate::cache_key::CacheKey;
use crate::category::{Category, Gender};
use crate::encoding::GuaCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Luck level used when the oracle could not be reached.
pub const BUSY_LUCK_LEVEL: &str = "系統繁忙";
/// Luck level used when the reading template is misconfigured.
pub const MISCONFIGURED_LUCK_LEVEL: &str = "設定異常";
/// Hexagram name used when the oracle does not name one.
pub const FALLBACK_HEXAGRAM_NAME: &str = "象棋神卦";

/// The four display fields of a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivinationResult {
    /// Verdict, e.g. 大吉
    pub luck_level: String,
    pub hexagram_name: String,
    /// Full explanation including pattern tags and net score
    pub analysis: String,
    pub advice: String,
}

impl DivinationResult {
    /// Result shown when the oracle call failed.
    pub fn service_busy(error: impl std::fmt::Display) -> Self {
        Self {
            luck_level: BUSY_LUCK_LEVEL.to_string(),
            hexagram_name: "靜心等待".to_string(),
            analysis: format!("無法連接神諭 (API Error)。\n{}", error),
            advice: "請稍後再試。".to_string(),
        }
    }

    /// Result shown when the reading template could not produce a usable
    /// prompt.
    pub fn misconfigured(diagnostic: impl Into<String>) -> Self {
        Self {
            luck_level: MISCONFIGURED_LUCK_LEVEL.to_string(),
            hexagram_name: FALLBACK_HEXAGRAM_NAME.to_string(),
            analysis: diagnostic.into(),
            advice: "請聯繫管理員檢查系統提示詞設定。".to_string(),
        }
    }

    /// True for the placeholder results produced on failure.
    pub fn is_degraded(&self) -> bool {
        self.luck_level == BUSY_LUCK_LEVEL || self.luck_level == MISCONFIGURED_LUCK_LEVEL
    }
}

/// A persisted reading, addressed by its identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivinationRecord {
    /// Identity key (`code_CATEGORY[_GENDER]`), also the storage id
    pub unique_key: CacheKey,
    pub gua_code: GuaCode,
    pub category: Category,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(flatten)]
    pub result: DivinationResult,
    pub created_at: DateTime<Utc>,
    /// Captured board image as a data URL
    #[serde(default)]
    pub layout_image: Option<String>,
}

impl DivinationRecord {
    pub fn new(
        unique_key: CacheKey,
        gua_code: GuaCode,
        category: Category,
        gender: Option<Gender>,
        result: DivinationResult,
        layout_image: Option<String>,
    ) -> Self {
        Self {
            unique_key,
            gua_code,
            category,
            gender,
            result,
            created_at: Utc::now(),
            layout_image,
        }
    }

    pub fn id(&self) -> &str {
        self.unique_key.as_str()
    }
}

/// Partial update of a record. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub luck_level: Option<String>,
    pub hexagram_name: Option<String>,
    pub analysis: Option<String>,
    pub advice: Option<String>,
    pub layout_image: Option<String>,
}

impl RecordUpdate {
    pub fn layout_image(image: impl Into<String>) -> Self {
        Self {
            layout_image: Some(image.into()),
            ..Default::default()
        }
    }

    /// Drops fields that are blank, so an editor that leaves a field empty
    /// does not erase it.
    pub fn without_blanks(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        Self {
            luck_level: keep(self.luck_level),
            hexagram_name: keep(self.hexagram_name),
            analysis: keep(self.analysis),
            advice: keep(self.advice),
            layout_image: keep(self.layout_image),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.luck_level.is_none()
            && self.hexagram_name.is_none()
            && self.analysis.is_none()
            && self.advice.is_none()
            && self.layout_image.is_none()
    }

    /// Names of the fields this update touches, in storage naming.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.luck_level.is_some() {
            names.push("luck_level");
        }
        if self.hexagram_name.is_some() {
            names.push("hexagram_name");
        }
        if self.analysis.is_some() {
            names.push("analysis");
        }
        if self.advice.is_some() {
            names.push("advice");
        }
        if self.layout_image.is_some() {
            names.push("layout_image");
        }
        names
    }

    /// Merges this update into `record`.
    pub fn apply(&self, record: &mut DivinationRecord) {
        if let Some(v) = &self.luck_level {
            record.result.luck_level = v.clone();
        }
        if let Some(v) = &self.hexagram_name {
            record.result.hexagram_name = v.clone();
        }
        if let Some(v) = &self.analysis {
            record.result.analysis = v.clone();
        }
        if let Some(v) = &self.advice {
            record.result.advice = v.clone();
        }
        if let Some(v) = &self.layout_image {
            record.layout_image = Some(v.clone());
        }
    }
}
