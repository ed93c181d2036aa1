//! Artifact generation pipeline
//!
//! Each operation checks its prerequisite, composes a prompt, asks the
//! configured backend and stores the result in the session. A backend failure
//! never fails the operation: the kind's fallback text is stored instead.

use std::sync::Arc;

use cinema_llm::{LlmError, LlmService};
use serde::Serialize;

use super::entities::{ArtifactKind, DerivedKind, ScreenplayParams, Session};
use super::prompts::{self, GenerationRequest};
use crate::error::StudioError;

/// Outcome of one generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated {
    pub kind: ArtifactKind,
    pub content: String,
    /// Whether `content` is the fallback text rather than backend output
    pub fallback: bool,
}

#[derive(Clone)]
pub struct StudioPipeline {
    llm: Arc<dyn LlmService>,
}

impl StudioPipeline {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    /// Generate a screenplay and record it with its inputs
    pub async fn generate_screenplay(
        &self,
        session: &mut Session,
        params: ScreenplayParams,
    ) -> Result<Generated, StudioError> {
        if params.story.trim().is_empty() || params.genre.trim().is_empty() {
            return Err(cinema_common::Error::Validation(
                "story and genre are required".to_string(),
            )
            .into());
        }

        let request = prompts::screenplay_request(&params);
        let (content, fallback) = match self.generate(request).await {
            Ok(text) => (text, false),
            Err(e) => {
                tracing::warn!(kind = %ArtifactKind::Screenplay, error = %e, "Generation failed, using fallback text");
                (prompts::screenplay_fallback(&params), true)
            }
        };

        session.record_screenplay(params, content.clone());

        Ok(Generated {
            kind: ArtifactKind::Screenplay,
            content,
            fallback,
        })
    }

    /// Generate an artifact derived from the session's story or screenplay
    pub async fn generate_derived(
        &self,
        session: &mut Session,
        kind: DerivedKind,
    ) -> Result<Generated, StudioError> {
        let prerequisite = kind.prerequisite();
        let source = session
            .prerequisite(prerequisite)
            .ok_or(StudioError::MissingPrerequisite(
                prerequisite.missing_message(),
            ))?;

        let request = prompts::derived_request(kind, source);
        let (content, fallback) = match self.generate(request).await {
            Ok(text) => (text, false),
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Generation failed, using fallback text");
                (prompts::derived_fallback(kind).to_string(), true)
            }
        };

        session.set_artifact(kind.artifact_kind(), content.clone());

        Ok(Generated {
            kind: kind.artifact_kind(),
            content,
            fallback,
        })
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
        tracing::debug!(model = %self.llm.default_model(), "Dispatching generation request");

        let response = self.llm.complete(request.into()).await?;
        if response.content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(response.content)
    }
}
