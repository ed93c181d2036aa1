//! Studio domain state

use std::sync::Arc;

use axum::extract::FromRef;
use cinema_llm::LlmService;
use cinema_replicate::ImageService;

use crate::config::StudioConfig;
use crate::domain::export::Exporter;
use crate::domain::pipeline::StudioPipeline;
use crate::domain::storyboard::Storyboarder;
use crate::repository::{InMemorySessionStore, SessionStore};

/// Application state for the Studio domain
#[derive(Clone)]
pub struct StudioState {
    pub sessions: Arc<dyn SessionStore>,
    pub pipeline: StudioPipeline,
    pub exporter: Exporter,
    pub storyboard: Storyboarder,
}

impl StudioState {
    /// Wire the domain services over an in-memory session store
    pub fn new(
        llm: Arc<dyn LlmService>,
        images: Arc<dyn ImageService>,
        config: StudioConfig,
    ) -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new(config.session_ttl)),
            pipeline: StudioPipeline::new(llm),
            exporter: Exporter::new(config.pdf_layout),
            storyboard: Storyboarder::new(images, config.storyboard),
        }
    }
}

impl FromRef<StudioState> for Arc<dyn SessionStore> {
    fn from_ref(state: &StudioState) -> Self {
        state.sessions.clone()
    }
}
