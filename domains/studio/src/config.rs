//! Studio configuration

use anyhow::{Context, Result};

use crate::domain::export::{LongLinePolicy, PdfLayout};
use crate::domain::storyboard::StoryboardSettings;

#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    pub session_ttl: chrono::Duration,
    pub pdf_layout: PdfLayout,
    pub storyboard: StoryboardSettings,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            session_ttl: chrono::Duration::seconds(86_400),
            pdf_layout: PdfLayout::default(),
            storyboard: StoryboardSettings::default(),
        }
    }
}

impl StudioConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let session_ttl = match parse_var::<i64>("SESSION_TTL_SECS")? {
            Some(secs) if secs > 0 => chrono::Duration::try_seconds(secs)
                .ok_or_else(|| anyhow::anyhow!("SESSION_TTL_SECS out of range: {}", secs))?,
            Some(secs) => anyhow::bail!("SESSION_TTL_SECS must be positive, got {}", secs),
            None => defaults.session_ttl,
        };
        let long_lines = match std::env::var("PDF_LONG_LINES") {
            Ok(raw) => raw
                .parse::<LongLinePolicy>()
                .map_err(|e| anyhow::anyhow!("Invalid PDF_LONG_LINES: {}", e))?,
            Err(_) => LongLinePolicy::default(),
        };

        let marker = std::env::var("STORYBOARD_SCENE_MARKER")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(defaults.storyboard.marker);

        Ok(Self {
            session_ttl,
            pdf_layout: PdfLayout {
                long_lines,
                ..defaults.pdf_layout
            },
            storyboard: StoryboardSettings {
                marker,
                max_fragment_chars: parse_var("STORYBOARD_MAX_FRAGMENT_CHARS")?
                    .unwrap_or(defaults.storyboard.max_fragment_chars),
                width: parse_var("STORYBOARD_WIDTH")?.unwrap_or(defaults.storyboard.width),
                height: parse_var("STORYBOARD_HEIGHT")?.unwrap_or(defaults.storyboard.height),
            },
        })
    }
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid {}: '{}'", key, raw)),
        Err(_) => Ok(None),
    }
}
