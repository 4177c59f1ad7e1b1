//! Structured oracle response for a reading.

use bugua_core::DivinationResult;
use bugua_core::divination::FALLBACK_HEXAGRAM_NAME;
use bugua_interaction::AgentError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Score breakdown reported by the oracle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default)]
    pub gain: Option<f64>,
    #[serde(default)]
    pub loss: Option<f64>,
    #[serde(default)]
    pub net: Option<f64>,
}

/// The JSON object the oracle is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingResponse {
    /// e.g. 小吉, 大凶
    pub verdict: String,
    pub explanation: String,
    pub advice: String,
    /// Detected patterns, most significant first
    pub pattern_tags: Vec<String>,
    #[serde(default)]
    pub scores: Option<Scores>,
    #[serde(default)]
    pub layout_visual: Option<String>,
}

impl ReadingResponse {
    /// Gemini `responseSchema` for this type.
    pub fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "layout_visual": { "type": "STRING" },
                "pattern_tags": { "type": "ARRAY", "items": { "type": "STRING" } },
                "scores": {
                    "type": "OBJECT",
                    "properties": {
                        "gain": { "type": "NUMBER" },
                        "loss": { "type": "NUMBER" },
                        "net": { "type": "NUMBER" }
                    }
                },
                "verdict": { "type": "STRING" },
                "explanation": { "type": "STRING" },
                "advice": { "type": "STRING" }
            },
            "required": ["verdict", "explanation", "advice", "pattern_tags"]
        })
    }

    /// Parses raw model output, tolerating a surrounding markdown fence.
    pub fn parse(raw: &str) -> Result<Self, AgentError> {
        let body = strip_code_fence(raw);
        let response: ReadingResponse = serde_json::from_str(body)
            .map_err(|e| AgentError::ParseError(format!("reading response: {}", e)))?;
        if response.verdict.trim().is_empty() {
            return Err(AgentError::ParseError("reading response has an empty verdict".into()));
        }
        Ok(response)
    }

    /// Maps the oracle's answer to the displayed reading.
    pub fn into_result(self) -> DivinationResult {
        let hexagram_name = self
            .pattern_tags
            .first()
            .filter(|tag| !tag.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| FALLBACK_HEXAGRAM_NAME.to_string());
        let net = self.scores.and_then(|s| s.net).unwrap_or(0.0);
        let analysis = format!(
            "{}\n\n[格局]: {}\n[淨值]: {}",
            self.explanation,
            self.pattern_tags.join(", "),
            net
        );

        DivinationResult {
            luck_level: self.verdict,
            hexagram_name,
            analysis,
            advice: self.advice,
        }
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line, e.g. ```json
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
