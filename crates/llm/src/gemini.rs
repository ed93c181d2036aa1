//! Google Gemini API Implementation
//!
//! Calls `models/{model}:generateContent` on the Generative Language API
//! (https://generativelanguage.googleapis.com/v1beta) using reqwest HTTP client.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{CompletionRequest, CompletionResponse, LlmConfig, LlmError, LlmService};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "modelVersion", default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    status: Option<String>,
    message: String,
}

/// Gemini LLM service implementation
pub struct GeminiService {
    client: Client,
    config: LlmConfig,
    api_key: String,
    base_url: String,
}

impl GeminiService {
    /// Create a new Gemini service. Requires an API key.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Configuration("GEMINI_API_KEY is required for the gemini provider".to_string())
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            api_key,
            base_url,
        })
    }
}

#[async_trait::async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());

        let prompt = request.combined_prompt();
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature.unwrap_or(self.config.temperature),
                max_output_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        tracing::debug!(model = %model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimit);
        }

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(LlmError::Response(format!(
                    "Gemini API error ({}): {}",
                    error_response
                        .error
                        .status
                        .unwrap_or_else(|| status.to_string()),
                    error_response.error.message
                )));
            }

            return Err(LlmError::Response(format!(
                "Gemini API returned {}: {}",
                status, error_body
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Response(format!("Failed to parse response: {}", e)))?;

        // Text of the first candidate, joined across its parts
        let content = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(CompletionResponse {
            content,
            model: api_response.model_version.unwrap_or(model),
        })
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
