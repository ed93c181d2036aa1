//! Coffee-with-Cinema Image Service
//!
//! Provides storyboard image generation via external image backends:
//! - Replicate predictions API (SDXL) for production
//! - Mock image service for testing and development
//! - Configurable provider, model version, and polling bounds

pub mod client;
pub mod mock;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("Image configuration error: {0}")]
    Configuration(String),

    #[error("Image request error: {0}")]
    Request(String),

    #[error("Image response error: {0}")]
    Response(String),

    #[error("Image generation failed: {0}")]
    Failed(String),

    #[error("Image generation did not finish after {0} polls")]
    Timeout(u32),
}

/// Request for one generated image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
}

/// Image service configuration
#[derive(Clone)]
pub struct ImageConfig {
    /// Backend provider (replicate, mock)
    pub provider: String,
    pub api_token: Option<String>,
    /// `owner/name` of the model on Replicate
    pub model: String,
    /// Pinned model version; when unset the model's latest version is used
    pub version: Option<String>,
    pub base_url: Option<String>,
    pub poll_interval: Duration,
    pub max_polls: u32,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ImageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageConfig")
            .field("provider", &self.provider)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("version", &self.version)
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .field("max_polls", &self.max_polls)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_token: None,
            model: "stability-ai/sdxl".to_string(),
            version: None,
            base_url: None,
            poll_interval: Duration::from_millis(1000),
            max_polls: 60,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl ImageConfig {
    /// Create image config from environment variables
    pub fn from_env() -> Result<Self, ImageError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let poll_interval = match std::env::var("REPLICATE_POLL_INTERVAL_MS") {
            Ok(raw) => Duration::from_millis(raw.parse().map_err(|_| {
                ImageError::Configuration(format!(
                    "REPLICATE_POLL_INTERVAL_MS must be a positive integer, got '{}'",
                    raw
                ))
            })?),
            Err(_) => defaults.poll_interval,
        };

        let max_polls = match std::env::var("REPLICATE_MAX_POLLS") {
            Ok(raw) => raw.parse().map_err(|_| {
                ImageError::Configuration(format!(
                    "REPLICATE_MAX_POLLS must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            Err(_) => defaults.max_polls,
        };

        Ok(Self {
            provider: std::env::var("IMAGE_PROVIDER").unwrap_or(defaults.provider),
            api_token: std::env::var("REPLICATE_API_TOKEN").ok(),
            model: std::env::var("REPLICATE_MODEL").unwrap_or(defaults.model),
            version: std::env::var("REPLICATE_VERSION").ok(),
            base_url: std::env::var("REPLICATE_BASE_URL").ok(),
            poll_interval,
            max_polls,
            request_timeout: defaults.request_timeout,
        })
    }
}

/// Image service trait for different generation backends
#[async_trait::async_trait]
pub trait ImageService: Send + Sync {
    /// Generate images for one prompt and return their URLs in backend order
    async fn generate_image(&self, request: ImageRequest) -> Result<Vec<String>, ImageError>;
}

/// Factory for creating ImageService implementations
pub struct ImageServiceFactory;

impl ImageServiceFactory {
    pub fn create(config: ImageConfig) -> Result<Box<dyn ImageService>, ImageError> {
        match config.provider.as_str() {
            "replicate" => {
                tracing::info!(model = %config.model, "Creating Replicate image service");
                Ok(Box::new(client::ReplicateService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock image service");
                Ok(Box::new(mock::MockImageService::new()))
            }
            provider => Err(ImageError::Configuration(format!(
                "Unknown image provider: {}. Supported providers: replicate, mock",
                provider
            ))),
        }
    }
}
