//! Records and prompt administration.

use anyhow::{Result, bail};
use bugua_core::divination::{ConnectionStatus, DivinationRepository};
use bugua_core::prompt::{DEFAULT_SYSTEM_PROMPT, PromptRepository, missing_required_markers};
use crate::prompt_template::{PromptInput, render_reading_prompt};
use bugua_core::{BuguaError, Category, DivinationRecord, Gender, GuaCode, RecordUpdate};
use bugua_infrastructure::Stores;
use std::sync::Arc;

const SAMPLE_CODE: &str = "117 227 313 426 521";

/// Where the effective reading template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    Stored,
    BuiltIn,
}

#[derive(Debug, Clone)]
pub struct EffectivePrompt {
    pub text: String,
    pub source: PromptSource,
}

/// Admin operations over the record and prompt stores.
///
/// Unlike the reading flow, failures here are returned to the caller.
pub struct RecordsService {
    records: Arc<dyn DivinationRepository>,
    prompts: Arc<dyn PromptRepository>,
}

impl RecordsService {
    pub fn new(records: Arc<dyn DivinationRepository>, prompts: Arc<dyn PromptRepository>) -> Self {
        Self { records, prompts }
    }

    pub fn from_stores(stores: &Stores) -> Self {
        Self::new(stores.records.clone(), stores.prompts.clone())
    }

    /// All records, newest first.
    pub async fn list(&self) -> Result<Vec<DivinationRecord>> {
        self.records.list_all().await
    }

    pub async fn show(&self, key: &str) -> Result<DivinationRecord> {
        match self.records.find_by_id(key).await? {
            Some(record) => Ok(record),
            None => Err(BuguaError::not_found("DivinationRecord", key).into()),
        }
    }

    /// Applies the non-blank fields of `update`.
    pub async fn edit(&self, key: &str, update: RecordUpdate) -> Result<DivinationRecord> {
        let update = update.without_blanks();
        if update.is_empty() {
            bail!("nothing to update: every field is blank");
        }
        tracing::info!("[Admin] Updating {} fields {:?}", key, update.field_names());
        match self.records.update(key, &update).await? {
            Some(record) => Ok(record),
            None => Err(BuguaError::not_found("DivinationRecord", key).into()),
        }
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        tracing::info!("[Admin] Deleting {}", key);
        self.records.delete(key).await
    }

    pub async fn check_connection(&self) -> ConnectionStatus {
        self.records.check_connection().await
    }

    pub async fn prompt(&self) -> Result<EffectivePrompt> {
        Ok(match self.prompts.load_system_prompt().await? {
            Some(text) => EffectivePrompt {
                text,
                source: PromptSource::Stored,
            },
            None => EffectivePrompt {
                text: DEFAULT_SYSTEM_PROMPT.to_string(),
                source: PromptSource::BuiltIn,
            },
        })
    }

    /// Stores a new template and returns the required markers it lacks.
    ///
    /// The template is test-rendered first. A template with missing markers is
    /// still saved; readings made with it will come back as configuration
    /// errors.
    pub async fn set_prompt(&self, text: &str) -> Result<Vec<&'static str>> {
        if text.trim().is_empty() {
            bail!("prompt is empty");
        }
        let missing = missing_required_markers(text);
        if let Err(e) = trial_render(text) {
            tracing::warn!("[Admin] Saving prompt that will not render ({:?}): {}", missing, e);
        }
        self.prompts.save_system_prompt(text).await?;
        Ok(missing)
    }

    pub async fn reset_prompt(&self) -> Result<()> {
        tracing::info!("[Admin] Resetting prompt to built-in default");
        self.prompts.reset_system_prompt().await
    }
}

/// Renders `template` for a sample reading.
fn trial_render(template: &str) -> std::result::Result<String, BuguaError> {
    let code = GuaCode::from_stored(SAMPLE_CODE);
    render_reading_prompt(
        template,
        PromptInput {
            code: &code,
            category: Category::General,
            gender: Some(Gender::Male),
        },
    )
}
