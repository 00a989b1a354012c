//! Generation backend for ticket analysis
//!
//! Provides a `GenerationBackend` trait and a Gemini implementation that calls
//! `generateContent` with a JSON response schema. One request per call: no
//! retries, no streaming.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default generation model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Public Gemini API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// GenerationBackend trait
// ============================================================================

/// Abstraction over structured-generation providers.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send `prompt` constrained by `schema` and return the raw reply text.
    async fn generate(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GenerationError>;

    /// Model name for logging.
    fn model(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Response contained no text")]
    EmptyResponse,

    #[error("Missing API key")]
    MissingApiKey,
}

// ============================================================================
// Config
// ============================================================================

/// Gemini client configuration. The key is injected by the caller.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
        }
    }

    pub fn from_model_config(api_key: impl Into<String>, model: &crate::config::ModelConfig) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.name.clone(),
            base_url: model.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: model.timeout_seconds,
        }
    }
}

// ============================================================================
// Gemini API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    code: u16,
    message: String,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

// ============================================================================
// GeminiClient
// ============================================================================

/// Gemini client: calls the `generateContent` endpoint with JSON output.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        if config.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client against a custom base URL (for testing / proxies)
    pub fn with_base_url(
        mut config: GeminiConfig,
        base_url: String,
    ) -> Result<Self, GenerationError> {
        config.base_url = base_url;
        Self::new(config)
    }

    async fn generate_once(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        tracing::debug!(model = %self.config.model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(scrub_url)?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let error_detail = serde_json::from_str::<GeminiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error);

            let (code, message) = error_detail
                .map(|e| (e.code, e.message))
                .unwrap_or((status.as_u16(), error_body));

            tracing::error!(code = code, message = %message, "Gemini API error");

            return Err(GenerationError::Api { code, message });
        }

        let body: GenerateResponse = response.json().await.map_err(scrub_url)?;

        body.text().ok_or(GenerationError::EmptyResponse)
    }
}

/// Drop the request URL from transport errors before they are logged.
fn scrub_url(e: reqwest::Error) -> GenerationError {
    GenerationError::Http(e.without_url())
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, GenerationError> {
        self.generate_once(prompt, schema).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 5,
        }
    }

    fn reply_with_text(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<serde_json::Value> =
            parts.iter().map(|t| serde_json::json!({ "text": t })).collect();
        serde_json::json!({
            "candidates": [
                { "content": { "role": "model", "parts": parts }, "finishReason": "STOP" }
            ]
        })
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_and_schema() {
        let mock_server = MockServer::start().await;
        let client = GeminiClient::with_base_url(test_config("test-api-key"), mock_server.uri())
            .expect("Failed to create client");
        let schema = serde_json::json!({ "type": "OBJECT" });

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "contents": [{ "parts": [{ "text": "analyze this" }] }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "OBJECT" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_text(&["{}"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client.generate("analyze this", &schema).await;

        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result.err());
        assert_eq!(result.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_generate_joins_and_trims_parts() {
        let mock_server = MockServer::start().await;
        let client =
            GeminiClient::with_base_url(test_config("k"), mock_server.uri()).unwrap();

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply_with_text(&["  {\"priority\":", " \"LOW\"}\n"])),
            )
            .mount(&mock_server)
            .await;

        let text = client.generate("p", &serde_json::json!({})).await.unwrap();
        assert_eq!(text, "{\"priority\": \"LOW\"}");
    }

    #[tokio::test]
    async fn test_generate_returns_api_error_without_retry() {
        let mock_server = MockServer::start().await;
        let client =
            GeminiClient::with_base_url(test_config("k"), mock_server.uri()).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "code": 429, "message": "Resource exhausted" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client.generate("p", &serde_json::json!({})).await;

        match result {
            Err(GenerationError::Api { code, message }) => {
                assert_eq!(code, 429);
                assert_eq!(message, "Resource exhausted");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_api_error_with_plain_body() {
        let mock_server = MockServer::start().await;
        let client =
            GeminiClient::with_base_url(test_config("k"), mock_server.uri()).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&mock_server)
            .await;

        match client.generate("p", &serde_json::json!({})).await {
            Err(GenerationError::Api { code, message }) => {
                assert_eq!(code, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_empty_candidates() {
        let mock_server = MockServer::start().await;
        let client =
            GeminiClient::with_base_url(test_config("k"), mock_server.uri()).unwrap();

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&mock_server)
            .await;

        let result = client.generate("p", &serde_json::json!({})).await;
        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_generate_api_key_not_in_url() {
        let mock_server = MockServer::start().await;
        let client = GeminiClient::with_base_url(test_config("SECRET-KEY-123"), mock_server.uri())
            .unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_with_text(&["{}"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        client.generate("p", &serde_json::json!({})).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);
        assert!(!requests[0].url.as_str().contains("SECRET-KEY-123"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_api_key() {
        let client =
            GeminiClient::with_base_url(test_config("SECRET-KEY-123"), "http://127.0.0.1:1".to_string())
                .unwrap();

        let err = client
            .generate("p", &serde_json::json!({}))
            .await
            .expect_err("closed port must fail");

        assert!(matches!(err, GenerationError::Http(_)));
        let message = err.to_string();
        assert!(!message.contains("SECRET-KEY-123"), "key leaked: {}", message);
        assert!(!message.contains("127.0.0.1:1"), "url leaked: {}", message);
    }

    #[test]
    fn test_new_fails_with_missing_api_key() {
        let result = GeminiClient::new(test_config(""));
        assert!(matches!(result, Err(GenerationError::MissingApiKey)));
    }

    #[test]
    fn test_backend_reports_model() {
        let mut config = test_config("k");
        config.model = "gemini-2.0-flash".to_string();
        let backend: Box<dyn GenerationBackend> = Box::new(GeminiClient::new(config).unwrap());
        assert_eq!(backend.model(), "gemini-2.0-flash");
    }
}
