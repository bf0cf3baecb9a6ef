//! Gemini Backend Implementation
//!
//! LLM backend for the Google Gemini `generateContent` REST API.
//!
//! # Gemini API
//!
//! - `POST {base_url}/{model}:generateContent` - Generate a completion
//! - `GET {base_url}` - List models (used as the health check)
//!
//! The API key travels in the `x-goog-api-key` header rather than the query
//! string so it never shows up in logged URLs.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::{LlmBackend, LlmRequest, LlmResponse};
use crate::config::AssistantConfig;

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// API key (requests fail without one)
    api_key: Option<String>,
    /// Models endpoint, without trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

/// `generateContent` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// `generateContent` response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create from the assistant section of the configuration
    pub fn from_config(config: &AssistantConfig) -> anyhow::Result<Self> {
        Self::new(config.api_key.clone(), config.base_url.clone(), config.timeout)
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Get generateContent endpoint URL
    fn generate_url(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model)
    }

    /// Build the JSON body for a request
    fn build_body(request: &LlmRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system.as_ref().map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system.clone(),
                }],
            }),
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: (request.max_tokens > 0).then_some(request.max_tokens),
            },
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: &GeminiResponse) -> String {
        response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn health_check(&self) -> bool {
        let Some(api_key) = self.api_key.as_deref() else {
            return false;
        };

        self.http_client
            .get(&self.base_url)
            .header("x-goog-api-key", api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
        let start = Instant::now();
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Gemini API key is not configured"))?;

        let body = Self::build_body(request);
        tracing::debug!(model = %request.model, "Sending Gemini request");

        let response = self
            .http_client
            .post(self.generate_url(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {status}: {body}");
        }

        let data: GeminiResponse = response.json().await?;
        let tokens_used = data
            .usage_metadata
            .as_ref()
            .and_then(|u| u.total_token_count);

        Ok(LlmResponse {
            content: Self::extract_text(&data),
            model: request.model.clone(),
            tokens_used,
            duration_ms: Some(start.elapsed().as_millis() as u64),
        })
    }
}
