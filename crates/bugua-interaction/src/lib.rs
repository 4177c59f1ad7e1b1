//! AI oracle clients for bugua.

pub mod agent;
pub mod gemini_api_agent;

pub use agent::{Agent, AgentError, AgentRequest, AgentRole, AgentTurn, UnavailableAgent};
pub use gemini_api_agent::GeminiApiAgent;

use bugua_core::config::AppConfig;
use std::sync::Arc;

/// Builds the configured oracle, or an [`UnavailableAgent`] when no Gemini
/// API key is set.
pub fn agent_from_config(config: &AppConfig) -> Arc<dyn Agent> {
    match config.gemini.as_ref().filter(|g| !g.api_key.trim().is_empty()) {
        Some(gemini) => {
            tracing::info!("[Oracle] Using Gemini model {}", gemini.model());
            Arc::new(GeminiApiAgent::from_config(gemini))
        }
        None => {
            tracing::warn!("[Oracle] No Gemini API key configured; readings will be unavailable");
            Arc::new(UnavailableAgent::new(
                "Gemini API key is not configured (set GEMINI_API_KEY or [gemini] api_key)",
            ))
        }
    }
}
