//! Divination record DTOs.
//!
//! The persisted shape is flat and string-typed so the same document works in
//! the local TOML store and in Firestore.

use bugua_core::divination::{DivinationRecord, DivinationResult};
use bugua_core::{CacheKey, Category, Gender, GuaCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current layout version of `records.toml`.
pub const RECORD_STORE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivinationRecordDto {
    pub unique_key: String,
    pub gua_code: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub luck_level: String,
    pub hexagram_name: String,
    pub analysis: String,
    pub advice: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_image: Option<String>,
}

impl From<&DivinationRecord> for DivinationRecordDto {
    fn from(record: &DivinationRecord) -> Self {
        Self {
            unique_key: record.unique_key.to_string(),
            gua_code: record.gua_code.to_string(),
            category: record.category.id().to_string(),
            gender: record.gender.map(|g| g.id().to_string()),
            luck_level: record.result.luck_level.clone(),
            hexagram_name: record.result.hexagram_name.clone(),
            analysis: record.result.analysis.clone(),
            advice: record.result.advice.clone(),
            created_at: record.created_at.to_rfc3339(),
            layout_image: record.layout_image.clone(),
        }
    }
}

impl TryFrom<DivinationRecordDto> for DivinationRecord {
    type Error = anyhow::Error;

    fn try_from(dto: DivinationRecordDto) -> Result<Self, Self::Error> {
        let category: Category = dto.category.parse().map_err(anyhow::Error::msg)?;
        let gender = dto
            .gender
            .filter(|g| !g.is_empty())
            .map(|g| g.parse::<Gender>())
            .transpose()
            .map_err(anyhow::Error::msg)?;
        let created_at = DateTime::parse_from_rfc3339(&dto.created_at)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "[Records] Bad created_at '{}' on {}: {}",
                    dto.created_at,
                    dto.unique_key,
                    e
                );
                DateTime::<Utc>::UNIX_EPOCH
            });

        Ok(DivinationRecord {
            unique_key: CacheKey::from_stored(dto.unique_key),
            gua_code: GuaCode::from_stored(dto.gua_code),
            category,
            gender,
            result: DivinationResult {
                luck_level: dto.luck_level,
                hexagram_name: dto.hexagram_name,
                analysis: dto.analysis,
                advice: dto.advice,
            },
            created_at,
            layout_image: dto.layout_image,
        })
    }
}

/// Contents of `records.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordStoreDto {
    pub version: String,
    #[serde(default)]
    pub records: BTreeMap<String, DivinationRecordDto>,
}

impl Default for RecordStoreDto {
    fn default() -> Self {
        Self {
            version: RECORD_STORE_VERSION.to_string(),
            records: BTreeMap::new(),
        }
    }
}
