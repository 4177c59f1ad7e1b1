//! TOML-based DivinationRepository implementation.

use crate::dto::{DivinationRecordDto, RecordStoreDto};
use crate::storage::AtomicTomlFile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bugua_core::divination::{
    ConnectionStatus, DivinationRecord, DivinationRepository, RecordUpdate,
};
use std::path::PathBuf;

/// Stores every record in one `records.toml`, keyed by identity key.
///
/// ```text
/// version = "1.0.0"
///
/// [records."117-227-313-426-521_CAREER_MALE"]
/// unique_key = "117-227-313-426-521_CAREER_MALE"
/// gua_code = "117 227 313 426 521"
/// ...
/// ```
///
/// Writes take an exclusive lock and replace the file atomically.
pub struct TomlDivinationRepository {
    file: AtomicTomlFile<RecordStoreDto>,
}

impl TomlDivinationRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path.into()),
        }
    }

    fn load_store(&self) -> Result<RecordStoreDto> {
        let store = self
            .file
            .load()
            .with_context(|| format!("Failed to read records file: {:?}", self.file.path()))?;
        Ok(store.unwrap_or_default())
    }
}

#[async_trait]
impl DivinationRepository for TomlDivinationRepository {
    async fn find_by_id(&self, key: &str) -> Result<Option<DivinationRecord>> {
        let mut store = self.load_store()?;
        match store.records.remove(key) {
            Some(dto) => Ok(Some(DivinationRecord::try_from(dto)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, record: &DivinationRecord) -> Result<()> {
        let dto = DivinationRecordDto::from(record);
        self.file
            .update(RecordStoreDto::default(), |store| {
                store.records.insert(dto.unique_key.clone(), dto);
                Some(())
            })
            .context("Failed to write records file")?;
        tracing::debug!("[Records] Saved {}", record.unique_key);
        Ok(())
    }

    async fn update(&self, key: &str, update: &RecordUpdate) -> Result<Option<DivinationRecord>> {
        if update.is_empty() {
            tracing::debug!("[Records] No fields to update for {}, skipping", key);
            return self.find_by_id(key).await;
        }

        let updated = self
            .file
            .update(RecordStoreDto::default(), |store| {
                let dto = store.records.get_mut(key)?;
                let mut record = match DivinationRecord::try_from(dto.clone()) {
                    Ok(record) => record,
                    Err(e) => return Some(Err(e)),
                };
                update.apply(&mut record);
                *dto = DivinationRecordDto::from(&record);
                Some(Ok(record))
            })
            .context("Failed to write records file")?;

        updated.transpose()
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.file
            .update(RecordStoreDto::default(), |store| {
                store.records.remove(key).map(|_| ())
            })
            .context("Failed to write records file")?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<DivinationRecord>> {
        let store = self.load_store()?;
        let mut records: Vec<DivinationRecord> = store
            .records
            .into_values()
            .filter_map(|dto| {
                let key = dto.unique_key.clone();
                DivinationRecord::try_from(dto)
                    .map_err(|e| tracing::warn!("[Records] Skipping unreadable record {}: {}", key, e))
                    .ok()
            })
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn check_connection(&self) -> ConnectionStatus {
        match self.load_store() {
            Ok(store) => ConnectionStatus::ok(format!(
                "Local store {:?} ({} records)",
                self.file.path(),
                store.records.len()
            )),
            Err(e) => ConnectionStatus::failed(format!("{:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugua_core::divination::DivinationResult;
    use bugua_core::{Category, Gender, GuaCode, build_key};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn record(code: &str, category: Category) -> DivinationRecord {
        DivinationRecord::new(
            build_key(code, category, Some(Gender::Male)),
            GuaCode::from_stored(code),
            category,
            Some(Gender::Male),
            DivinationResult {
                luck_level: "中吉".into(),
                hexagram_name: "牽制格".into(),
                analysis: "多行\n分析".into(),
                advice: "穩".into(),
            },
            None,
        )
    }

    fn repo(dir: &TempDir) -> TomlDivinationRepository {
        TomlDivinationRepository::new(dir.path().join("records.toml"))
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let saved = record("117 227 313 426 521", Category::Career);

        assert!(repo.find_by_id(saved.id()).await.unwrap().is_none());
        repo.save(&saved).await.unwrap();

        let found = repo.find_by_id(saved.id()).await.unwrap().unwrap();
        assert_eq!(found.result, saved.result);
        assert_eq!(found.gua_code, saved.gua_code);
    }

    #[tokio::test]
    async fn test_update_merges_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let saved = record("117 227 313 426 521", Category::Career);
        repo.save(&saved).await.unwrap();

        let update = RecordUpdate::layout_image("data:image/svg+xml;base64,AA==");
        let once = repo.update(saved.id(), &update).await.unwrap().unwrap();
        let twice = repo.update(saved.id(), &update).await.unwrap().unwrap();

        assert_eq!(once.layout_image, twice.layout_image);
        assert_eq!(twice.result, saved.result);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let update = RecordUpdate {
            advice: Some("x".into()),
            ..Default::default()
        };
        assert!(repo.update("nope", &update).await.unwrap().is_none());
        assert!(!dir.path().join("records.toml").exists());
    }

    #[tokio::test]
    async fn test_update_missing_record_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        repo.save(&record("117 227 313 426 521", Category::Career))
            .await
            .unwrap();
        let path = dir.path().join("records.toml");
        let before = std::fs::read_to_string(&path).unwrap();

        let update = RecordUpdate {
            advice: Some("x".into()),
            ..Default::default()
        };
        assert!(repo.update("nope", &update).await.unwrap().is_none());
        repo.delete("nope").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_list_newest_first_and_delete() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        let mut older = record("117 227 313 426 521", Category::Career);
        older.created_at = Utc::now() - Duration::hours(1);
        let newer = record("117 227 313 426 521", Category::Love);
        repo.save(&older).await.unwrap();
        repo.save(&newer).await.unwrap();

        let listed = repo.list_all().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].unique_key, newer.unique_key);

        repo.delete(older.id()).await.unwrap();
        repo.delete(older.id()).await.unwrap();
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_check_connection_reports_malformed_file() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        assert!(repo.check_connection().await.success);

        std::fs::write(dir.path().join("records.toml"), "records = 3").unwrap();
        assert!(!repo.check_connection().await.success);
        assert!(repo.find_by_id("k").await.is_err());
    }
}
