//! Coffee-with-Cinema Text Generation Service
//!
//! One configured backend answers every prompt:
//! - Ollama (local inference server)
//! - Google Gemini (managed cloud API)
//! - Mock service for testing and offline development
//!
//! The backend is a deployment-time choice made through `LlmConfig`.

pub mod gemini;
pub mod mock;
pub mod ollama;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM request timed out")]
    Timeout,

    #[error("LLM rate limit exceeded")]
    RateLimit,

    #[error("LLM response error: {0}")]
    Response(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    /// Classify a transport-level reqwest failure
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(format!("HTTP request failed: {}", err.without_url()))
        }
    }
}

/// A single-turn generation request: a role instruction plus context text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Persona and output-structure instruction, sent first
    pub system_prompt: String,
    /// Context the instruction operates on
    pub prompt: String,
    /// Overrides the configured model when set
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Role instruction and context joined into the single payload backends receive
    pub fn combined_prompt(&self) -> String {
        format!("{}\n\n{}", self.system_prompt, self.prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
}

const DEFAULT_OLLAMA_MODEL: &str = "granite-code:3b";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_MOCK_MODEL: &str = "mock-model";

/// Text generation configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Backend provider (ollama, gemini, mock)
    pub provider: String,
    pub default_model: String,
    /// Provider base URL override (Ollama server, Gemini API root, test servers)
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("default_model", &self.default_model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmConfig {
    /// Configuration for a provider with the stock model and generation options
    pub fn for_provider(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        let default_model = match provider.as_str() {
            "gemini" => DEFAULT_GEMINI_MODEL,
            "mock" => DEFAULT_MOCK_MODEL,
            _ => DEFAULT_OLLAMA_MODEL,
        }
        .to_string();

        Self {
            provider,
            default_model,
            base_url: None,
            api_key: None,
            temperature: 0.7,
            max_tokens: 2048,
            timeout: Duration::from_secs(300),
        }
    }

    /// Create LLM config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "ollama".to_string());
        let mut config = Self::for_provider(provider);

        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.default_model = model;
        }

        config.base_url = match config.provider.as_str() {
            "ollama" => std::env::var("OLLAMA_URL").ok(),
            "gemini" => std::env::var("GEMINI_BASE_URL").ok(),
            _ => None,
        };
        config.api_key = std::env::var("GEMINI_API_KEY").ok();

        if let Ok(raw) = std::env::var("LLM_TEMPERATURE") {
            config.temperature = raw.parse().map_err(|_| {
                LlmError::Configuration(format!("LLM_TEMPERATURE must be a number, got '{}'", raw))
            })?;
        }
        if let Ok(raw) = std::env::var("LLM_MAX_TOKENS") {
            config.max_tokens = raw.parse().map_err(|_| {
                LlmError::Configuration(format!(
                    "LLM_MAX_TOKENS must be a positive integer, got '{}'",
                    raw
                ))
            })?;
        }
        if let Ok(raw) = std::env::var("LLM_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                LlmError::Configuration(format!(
                    "LLM_TIMEOUT_SECS must be a positive integer, got '{}'",
                    raw
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// LLM service trait for different generation backends
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Send one prompt and wait for the generated text.
    /// A single failed attempt is final; callers decide how to degrade.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model used when the request does not name one
    fn default_model(&self) -> &str;
}

/// Factory for creating LlmService implementations
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "ollama" => {
                tracing::info!(model = %config.default_model, "Creating Ollama LLM service");
                Ok(Box::new(ollama::OllamaService::new(config)?))
            }
            "gemini" => {
                tracing::info!(model = %config.default_model, "Creating Gemini LLM service");
                Ok(Box::new(gemini::GeminiService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: ollama, gemini, mock",
                provider
            ))),
        }
    }
}
