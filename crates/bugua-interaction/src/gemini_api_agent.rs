//! GeminiApiAgent - Direct REST API implementation for Gemini.

use crate::agent::{Agent, AgentError, AgentRequest};
use async_trait::async_trait;
use bugua_core::config::{DEFAULT_GEMINI_MODEL, GeminiConfig};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Agent implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiApiAgent {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(config.api_key.clone(), config.model())
    }

    /// Uses the default model.
    pub fn with_default_model(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_GEMINI_MODEL)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(request: AgentRequest) -> Result<GenerateContentRequest, AgentError> {
        let contents: Vec<Content> = request
            .turns
            .into_iter()
            .filter(|turn| !turn.text.trim().is_empty())
            .map(|turn| Content {
                role: Some(turn.role.as_str().to_string()),
                parts: vec![Part { text: turn.text }],
            })
            .collect();

        if contents.is_empty() {
            return Err(AgentError::ExecutionFailed(
                "Gemini request must include at least one non-empty turn".into(),
            ));
        }

        let system_instruction = request.system_instruction.map(|text| Content {
            role: None,
            parts: vec![Part { text }],
        });

        let generation_config = request.response_schema.map(|schema| GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: schema,
        });

        Ok(GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
        })
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, AgentError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| AgentError::ProcessError {
                status_code: None,
                message: format!("Gemini API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
                retry_after: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AgentError::Other(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Agent for GeminiApiAgent {
    fn expertise(&self) -> &str {
        "Gemini API agent for xiangqi readings"
    }

    async fn execute(&self, request: AgentRequest) -> Result<String, AgentError> {
        let body = Self::build_request(request)?;
        tracing::debug!(
            "[Gemini] {} turn(s), structured output: {}",
            body.contents.len(),
            body.generation_config.is_some()
        );
        self.send_request(&body).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, AgentError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            AgentError::ExecutionFailed("Gemini API returned no text in the response candidates".into())
        })
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> AgentError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    match retry_after {
        Some(delay) => {
            AgentError::process_error_with_retry_after(status.as_u16(), message, is_retryable, delay)
        }
        None => AgentError::ProcessError {
            status_code: Some(status.as_u16()),
            message,
            is_retryable,
            retry_after: None,
        },
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date values are not supported.
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentTurn;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = AgentRequest::new(vec![
            AgentTurn::user("問"),
            AgentTurn::model("答"),
            AgentTurn::user("   "),
        ])
        .with_system_instruction("你是大師")
        .with_response_schema(json!({ "type": "OBJECT" }));

        let body = serde_json::to_value(GeminiApiAgent::build_request(request).unwrap()).unwrap();

        assert_eq!(body["contents"].as_array().unwrap().len(), 2);
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "你是大師");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_plain_request_has_no_generation_config() {
        let request = AgentRequest::new(vec![AgentTurn::user("hi")]);
        let body = serde_json::to_value(GeminiApiAgent::build_request(request).unwrap()).unwrap();
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_empty_request_is_rejected() {
        let request = AgentRequest::new(vec![AgentTurn::user("")]);
        assert!(GeminiApiAgent::build_request(request).is_err());
    }

    #[test]
    fn test_extract_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        }))
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_empty_candidates_fails() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            extract_text_response(response),
            Err(AgentError::ExecutionFailed(_))
        ));
    }

    #[test]
    fn test_map_http_error() {
        let body = r#"{"error":{"code":503,"message":"overloaded","status":"UNAVAILABLE"}}"#;
        let err = map_http_error(
            StatusCode::SERVICE_UNAVAILABLE,
            body.to_string(),
            Some(Duration::from_secs(3)),
        );
        assert!(err.is_retryable());
        assert!(err.to_string().contains("UNAVAILABLE: overloaded"));

        let err = map_http_error(StatusCode::BAD_REQUEST, "bad".into(), None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_parse_retry_after() {
        let header = HeaderValue::from_static("12");
        assert_eq!(parse_retry_after(Some(&header)), Some(Duration::from_secs(12)));
        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
    }
}
