//! Ollama Implementation
//!
//! Calls a local Ollama server (`POST /api/generate`) with streaming
//! disabled, using reqwest HTTP client.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{CompletionRequest, CompletionResponse, LlmConfig, LlmError, LlmService};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama generate request body
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama generate response body
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    model: Option<String>,
}

/// Ollama error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Ollama LLM service implementation
pub struct OllamaService {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

impl OllamaService {
    /// Create a new Ollama service
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
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
            base_url,
        })
    }
}

#[async_trait::async_trait]
impl LlmService for OllamaService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());

        let body = GenerateRequest {
            model: &model,
            prompt: request.combined_prompt(),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature.unwrap_or(self.config.temperature),
                num_predict: request.max_tokens.unwrap_or(self.config.max_tokens),
            },
        };

        let url = format!("{}/api/generate", self.base_url);

        tracing::debug!(model = %model, url = %url, "Sending Ollama generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_body) {
                return Err(LlmError::Response(format!(
                    "Ollama error ({}): {}",
                    status, error_response.error
                )));
            }

            return Err(LlmError::Response(format!(
                "Ollama returned {}: {}",
                status, error_body
            )));
        }

        let api_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Response(format!("Failed to parse response: {}", e)))?;

        if api_response.response.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(CompletionResponse {
            content: api_response.response,
            model: api_response.model.unwrap_or(model),
        })
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
