//! Divination use case implementation.
//!
//! This module provides the `DivinationUseCase` which turns a completed round
//! into a reading: board capture, cache lookup, oracle call and persistence.

use crate::prompt_template::{PromptInput, render_reading_prompt};
use crate::reading_response::ReadingResponse;
use bugua_core::capture::BoardCapture;
use bugua_core::divination::DivinationRepository;
use bugua_core::prompt::{DEFAULT_SYSTEM_PROMPT, PromptRepository, READING_TRIGGER};
use bugua_core::{
    BuguaError, CacheKey, DivinationRecord, DivinationResult, ReadingRequest, RecordUpdate,
    Round,
};
use bugua_infrastructure::Stores;
use bugua_interaction::{Agent, AgentError, AgentRequest, AgentTurn};
use std::sync::Arc;

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSource {
    /// An existing record with the same identity key
    Cache,
    /// A fresh oracle answer
    Oracle,
    /// A placeholder produced after a failure
    Degraded,
}

/// Result of [`DivinationUseCase::perform_reading`].
#[derive(Debug, Clone)]
pub struct ReadingOutcome {
    /// Identity key of the reading, also used to scope its chat
    pub key: CacheKey,
    pub result: DivinationResult,
    /// The stored record, when one exists for this reading
    pub record: Option<DivinationRecord>,
    pub source: ReadingSource,
}

/// Use case for producing readings.
///
/// # Failure policy
///
/// `perform_reading` never fails. Template problems and oracle failures become
/// degraded results; store and capture failures are logged and skipped. At
/// most one oracle call is made per identity key as long as the store is
/// reachable.
pub struct DivinationUseCase {
    /// Store of past readings keyed by identity key
    records: Arc<dyn DivinationRepository>,
    /// Administrator-edited reading template
    prompts: Arc<dyn PromptRepository>,
    agent: Arc<dyn Agent>,
    capture: Arc<dyn BoardCapture>,
}

impl DivinationUseCase {
    pub fn new(
        records: Arc<dyn DivinationRepository>,
        prompts: Arc<dyn PromptRepository>,
        agent: Arc<dyn Agent>,
        capture: Arc<dyn BoardCapture>,
    ) -> Self {
        Self {
            records,
            prompts,
            agent,
            capture,
        }
    }

    pub fn from_stores(
        stores: &Stores,
        agent: Arc<dyn Agent>,
        capture: Arc<dyn BoardCapture>,
    ) -> Self {
        Self::new(stores.records.clone(), stores.prompts.clone(), agent, capture)
    }

    /// Drives a round from `CATEGORY_SELECT` to `RESULT`.
    ///
    /// Only input incompleteness is returned as an error; in that case the
    /// round stays where `Round::begin_analysis` left it.
    pub async fn reveal(&self, round: &mut Round) -> Result<ReadingOutcome, BuguaError> {
        let request = round.begin_analysis()?;
        let outcome = self.perform_reading(&request).await;
        round.complete_analysis(outcome.result.clone());
        Ok(outcome)
    }

    /// Runs capture, lookup and (on a miss) the oracle for one request.
    pub async fn perform_reading(&self, request: &ReadingRequest) -> ReadingOutcome {
        let key = request.key.as_str();

        // 1. Capture (best-effort)
        let layout_image = match self.capture.capture(&request.board).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("[Capture] Board capture failed for {}: {:#}", key, e);
                None
            }
        };

        // 2. Cache lookup
        match self.records.find_by_id(key).await {
            Ok(Some(record)) => {
                tracing::info!("[Cache] Hit for {}", key);
                return self.serve_cached(record, layout_image).await;
            }
            Ok(None) => tracing::info!("[Cache] Miss for {}", key),
            Err(e) => {
                tracing::warn!("[Cache] Lookup failed for {}, treating as miss: {:#}", key, e)
            }
        }

        // 3. Prompt
        let template = self.effective_prompt().await;
        let system_prompt = match render_reading_prompt(
            &template,
            PromptInput {
                code: &request.code,
                category: request.category,
                gender: request.gender,
            },
        ) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!("[Prompt] Refusing to send reading request for {}: {}", key, e);
                return degraded(request, DivinationResult::misconfigured(template_diagnostic(e)));
            }
        };

        // 4. Oracle
        let result = match self.ask_oracle(system_prompt).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("[Oracle] Reading failed for {}: {}", key, e);
                return degraded(request, DivinationResult::service_busy(e));
            }
        };

        // 5. Persist (best-effort)
        let record = DivinationRecord::new(
            request.key.clone(),
            request.code.clone(),
            request.category,
            request.gender,
            result.clone(),
            layout_image,
        );
        match self.records.save(&record).await {
            Ok(()) => {
                if record.layout_image.is_some() {
                    tracing::info!("[Save] Result saved with image for {}", key);
                } else {
                    tracing::warn!("[Save] Result saved without image for {}", key);
                }
            }
            Err(e) => tracing::error!("[Save] Failed to save result for {}: {:#}", key, e),
        }

        ReadingOutcome {
            key: request.key.clone(),
            result,
            record: Some(record),
            source: ReadingSource::Oracle,
        }
    }

    /// Stored template, or the built-in default.
    pub async fn effective_prompt(&self) -> String {
        match self.prompts.load_system_prompt().await {
            Ok(Some(prompt)) => prompt,
            Ok(None) => DEFAULT_SYSTEM_PROMPT.to_string(),
            Err(e) => {
                tracing::warn!("[Prompt] Failed to load stored template, using default: {:#}", e);
                DEFAULT_SYSTEM_PROMPT.to_string()
            }
        }
    }

    async fn serve_cached(
        &self,
        record: DivinationRecord,
        layout_image: Option<String>,
    ) -> ReadingOutcome {
        let record = match layout_image {
            Some(image) if record.layout_image.as_deref() != Some(image.as_str()) => {
                self.backfill_image(record, image).await
            }
            _ => record,
        };

        ReadingOutcome {
            key: record.unique_key.clone(),
            result: record.result.clone(),
            record: Some(record),
            source: ReadingSource::Cache,
        }
    }

    /// Writes a fresh capture onto a cached record, leaving its text alone.
    async fn backfill_image(&self, mut record: DivinationRecord, image: String) -> DivinationRecord {
        let update = RecordUpdate::layout_image(image);
        match self.records.update(record.id(), &update).await {
            Ok(Some(updated)) => {
                tracing::info!("[Cache] Back-filled image for {}", updated.id());
                updated
            }
            Ok(None) => {
                tracing::warn!("[Cache] Record {} vanished before image back-fill", record.id());
                update.apply(&mut record);
                record
            }
            Err(e) => {
                tracing::warn!("[Cache] Image back-fill failed for {}: {:#}", record.id(), e);
                update.apply(&mut record);
                record
            }
        }
    }

    async fn ask_oracle(&self, system_prompt: String) -> Result<DivinationResult, AgentError> {
        let request = AgentRequest::new(vec![AgentTurn::user(READING_TRIGGER)])
            .with_system_instruction(system_prompt)
            .with_response_schema(ReadingResponse::schema());

        let raw = self.agent.execute(request).await?;
        let response = ReadingResponse::parse(&raw)?;
        tracing::debug!(
            "[Oracle] verdict={} tags={:?}",
            response.verdict,
            response.pattern_tags
        );
        Ok(response.into_result())
    }
}

fn degraded(request: &ReadingRequest, result: DivinationResult) -> ReadingOutcome {
    ReadingOutcome {
        key: request.key.clone(),
        result,
        record: None,
        source: ReadingSource::Degraded,
    }
}

fn template_diagnostic(error: BuguaError) -> String {
    match error {
        BuguaError::Template(message) => message,
        other => other.to_string(),
    }
}
