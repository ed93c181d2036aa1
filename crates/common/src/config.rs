//! Configuration management following 12-factor app principles
//!
//! Server-level settings are loaded from environment variables. Provider
//! and domain crates own their own sections (`LlmConfig`, `ImageConfig`,
//! `StudioConfig`).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Allowed CORS origins, comma separated. `None` means permissive.
    pub cors_allowed_origins: Option<String>,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => 3000,
        };

        let config = Self {
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .filter(|origins| !origins.trim().is_empty()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "cinema=debug".to_string()),
            port,
        };

        Ok(config)
    }
}
