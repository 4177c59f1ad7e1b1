//! Divination record repository trait.

use super::model::{DivinationRecord, RecordUpdate};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a connectivity probe against a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub success: bool,
    pub message: String,
}

impl ConnectionStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// An abstract key-value store for readings, keyed by identity key.
///
/// The store is the only memory of past readings; the orchestrator reads it
/// before every oracle call and writes to it after every fresh reading.
///
/// # Implementation Notes
///
/// - `save` overwrites an existing record with the same key.
/// - `update` merges non-`None` fields only and must be idempotent.
/// - `list_all` returns records newest first.
#[async_trait]
pub trait DivinationRepository: Send + Sync {
    /// Finds a record by identity key.
    ///
    /// - `Ok(Some(record))`: hit
    /// - `Ok(None)`: miss
    /// - `Err(_)`: the store could not be read
    async fn find_by_id(&self, key: &str) -> Result<Option<DivinationRecord>>;

    /// Saves a record under its identity key.
    async fn save(&self, record: &DivinationRecord) -> Result<()>;

    /// Merges `update` into the record with `key`.
    ///
    /// Returns the updated record, or `None` if no record exists.
    async fn update(&self, key: &str, update: &RecordUpdate) -> Result<Option<DivinationRecord>>;

    /// Deletes a record (no error if it did not exist).
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists all records, newest first.
    async fn list_all(&self) -> Result<Vec<DivinationRecord>>;

    /// Probes the store.
    async fn check_connection(&self) -> ConnectionStatus;
}
