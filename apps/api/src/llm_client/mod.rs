/// LLM Client: the single point of entry for all Gemini API calls in ResumeAI.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gemini-2.5-flash (hardcoded)
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// Official Google Gemini API endpoint. Overridable through config for local mocks.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls in ResumeAI.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// How often and how patiently a failed provider call is retried.
///
/// Only transport errors, 429 and 5xx are retried. `max_attempts = 1`
/// means a single best-effort call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(8000),
        }
    }
}

impl RetryPolicy {
    #[cfg(test)]
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff before retry number `retry` (1-based): base, 2×base, 4×base, … capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction<'a>>,
    generation_config: GeminiGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl LlmResponse {
    /// Concatenated text of the first candidate. `None` when nothing but whitespace came back.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Why the first candidate stopped, e.g. `STOP`, `SAFETY` or `MAX_TOKENS`.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single LLM client used by all services in ResumeAI.
/// Wraps the Gemini `generateContent` API with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(api_key: String, retry: RetryPolicy, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            retry,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, MODEL)
    }

    /// Makes a raw call to the Gemini API constrained to `schema`, returning the full response.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        system: Option<&str>,
        schema: &Value,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            system_instruction: system.map(|text| GeminiSystemInstruction {
                parts: vec![GeminiPart { text }],
            }),
            generation_config: GeminiGenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema: schema,
            },
        };

        let url = self.endpoint();
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay_for(attempt);
                warn!(
                    attempt,
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    warn!(attempt, "LLM transport error: {e}");
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            if let Some(usage) = &llm_response.usage_metadata {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RetriesExhausted {
            attempts: self.retry.max_attempts,
        }))
    }

    /// Calls the LLM and deserializes the text response as JSON.
    /// An empty reply is `EmptyContent`; anything unparseable is `Parse`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: Option<&str>,
        schema: &Value,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system, schema).await?;

        let Some(text) = response.text() else {
            warn!(
                finish_reason = response.finish_reason().unwrap_or("none"),
                "LLM returned no text"
            );
            return Err(LlmError::EmptyContent);
        };

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped)
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    async fn client_for(
        replies: Vec<(StatusCode, Value)>,
        attempts: u32,
    ) -> (LlmClient, std::sync::Arc<std::sync::atomic::AtomicU32>) {
        let (base, hits) = mock::spawn(replies).await;
        let client = LlmClient::new(
            "test-key".into(),
            fast_policy(attempts),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base);
        (client, hits)
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"atsScore\": 70}\n```";
        assert_eq!(strip_json_fences(input), "{\"atsScore\": 70}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"atsScore\": 70}\n```";
        assert_eq!(strip_json_fences(input), "{\"atsScore\": 70}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"atsScore\": 70}\n";
        assert_eq!(strip_json_fences(input), "{\"atsScore\": 70}");
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(8000));
        assert_eq!(policy.delay_for(10), Duration::from_millis(8000));
        assert_eq!(policy.delay_for(40), Duration::from_millis(8000));
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let response: LlmResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_text_is_none_without_candidates_or_text() {
        let none: LlmResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(none.text().is_none());

        let blank: LlmResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  \n" }] }, "finishReason": "STOP" }]
        }))
        .unwrap();
        assert!(blank.text().is_none());

        let blocked: LlmResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .unwrap();
        assert!(blocked.text().is_none());
    }

    #[test]
    fn test_finish_reason_of_empty_reply() {
        let safety: LlmResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert!(safety.text().is_none());
        assert_eq!(safety.finish_reason(), Some("SAFETY"));

        let none: LlmResponse = serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert_eq!(none.finish_reason(), None);
    }

    #[test]
    fn test_request_body_uses_gemini_field_names() {
        let schema = json!({ "type": "OBJECT" });
        let body = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: "hi" }],
            }],
            system_instruction: None,
            generation_config: GeminiGenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema: &schema,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(value.get("systemInstruction").is_none());
    }

    #[tokio::test]
    async fn test_call_json_parses_reply() {
        let (client, hits) =
            client_for(vec![(StatusCode::OK, mock::reply_with_text("{\"n\": 7}"))], 3).await;
        let value: Value = client.call_json("prompt", None, &json!({})).await.unwrap();
        assert_eq!(value["n"], 7);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_until_success() {
        let (client, hits) = client_for(
            vec![
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": { "message": "overloaded" } })),
                (StatusCode::TOO_MANY_REQUESTS, json!({ "error": { "message": "slow down" } })),
                (StatusCode::OK, mock::reply_with_text("{\"n\": 1}")),
            ],
            3,
        )
        .await;
        let value: Value = client.call_json("prompt", None, &json!({})).await.unwrap();
        assert_eq!(value["n"], 1);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (client, hits) = client_for(
            vec![(
                StatusCode::BAD_REQUEST,
                json!({
                    "error": {
                        "code": 400,
                        "message": "API key not valid",
                        "status": "INVALID_ARGUMENT"
                    }
                }),
            )],
            3,
        )
        .await;
        let err = client.call("prompt", None, &json!({})).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_returns_last_provider_error() {
        let (client, hits) = client_for(
            vec![(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": { "message": "boom" } }))],
            1,
        )
        .await;
        let err = client.call("prompt", None, &json!({})).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_truncated_reply_is_empty_content() {
        let (client, _) = client_for(
            vec![(
                StatusCode::OK,
                json!({
                    "candidates": [{ "content": { "parts": [] }, "finishReason": "MAX_TOKENS" }]
                }),
            )],
            1,
        )
        .await;
        let err = client
            .call_json::<Value>("prompt", None, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_empty_reply_is_empty_content() {
        let (client, _) =
            client_for(vec![(StatusCode::OK, json!({ "candidates": [] }))], 1).await;
        let err = client
            .call_json::<Value>("prompt", None, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_parse_error() {
        let (client, _) = client_for(
            vec![(StatusCode::OK, mock::reply_with_text("{\"atsScore\": 8"))],
            1,
        )
        .await;
        let err = client
            .call_json::<Value>("prompt", None, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
