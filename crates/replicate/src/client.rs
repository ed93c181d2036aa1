//! Replicate predictions API client
//!
//! Creates a prediction with `Prefer: wait` and, if it is still running when
//! the call returns, polls the prediction until it reaches a terminal status.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ImageConfig, ImageError, ImageRequest, ImageService};

const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    get: Option<String>,
}

/// Replicate image service implementation
pub struct ReplicateService {
    client: Client,
    config: ImageConfig,
    api_token: String,
    base_url: String,
}

impl ReplicateService {
    /// Create a new Replicate service. Requires an API token.
    pub fn new(config: ImageConfig) -> Result<Self, ImageError> {
        let api_token = config
            .api_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                ImageError::Configuration(
                    "REPLICATE_API_TOKEN is required for the replicate provider".to_string(),
                )
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ImageError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            api_token,
            base_url,
        })
    }

    fn create_url(&self) -> String {
        match self.config.version {
            Some(_) => format!("{}/v1/predictions", self.base_url),
            None => format!("{}/v1/models/{}/predictions", self.base_url, self.config.model),
        }
    }

    async fn read_prediction(response: reqwest::Response) -> Result<Prediction, ImageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ImageError::Response(format!(
                "Replicate returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ImageError::Response(format!("Failed to parse prediction: {}", e)))
    }

    async fn poll(&self, prediction: &Prediction) -> Result<Prediction, ImageError> {
        let url = prediction
            .urls
            .as_ref()
            .and_then(|urls| urls.get.clone())
            .unwrap_or_else(|| format!("{}/v1/predictions/{}", self.base_url, prediction.id));

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ImageError::Request(format!("HTTP request failed: {}", e)))?;

        Self::read_prediction(response).await
    }
}

/// URLs from a prediction output, which is either one URL or a list of them
fn output_urls(output: Option<serde_json::Value>) -> Vec<String> {
    match output {
        Some(serde_json::Value::String(url)) => vec![url],
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(url) => Some(url),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn error_message(error: Option<serde_json::Value>) -> String {
    match error {
        Some(serde_json::Value::String(message)) => message,
        Some(other) => other.to_string(),
        None => "prediction did not succeed".to_string(),
    }
}

#[async_trait::async_trait]
impl ImageService for ReplicateService {
    async fn generate_image(&self, request: ImageRequest) -> Result<Vec<String>, ImageError> {
        let body = PredictionRequest {
            version: self.config.version.as_deref(),
            input: PredictionInput {
                prompt: &request.prompt,
                width: request.width,
                height: request.height,
            },
        };

        tracing::debug!(model = %self.config.model, "Creating Replicate prediction");

        let response = self
            .client
            .post(self.create_url())
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageError::Request(format!("HTTP request failed: {}", e)))?;

        let mut prediction = Self::read_prediction(response).await?;
        let mut polls = 0;

        loop {
            match prediction.status.as_str() {
                "succeeded" => {
                    let urls = output_urls(prediction.output);
                    if urls.is_empty() {
                        return Err(ImageError::Response(
                            "Prediction succeeded without output URLs".to_string(),
                        ));
                    }
                    tracing::debug!(prediction_id = %prediction.id, images = urls.len(), "Replicate prediction succeeded");
                    return Ok(urls);
                }
                "failed" | "canceled" => {
                    return Err(ImageError::Failed(error_message(prediction.error)));
                }
                _ => {
                    if polls >= self.config.max_polls {
                        return Err(ImageError::Timeout(polls));
                    }
                    polls += 1;
                    tokio::time::sleep(self.config.poll_interval).await;
                    prediction = self.poll(&prediction).await?;
                }
            }
        }
    }
}
