//! Storyboard handler

use axum::{extract::State, Json};
use cinema_common::ValidatedJson;
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use validator::Validate;

use crate::api::middleware::StudioState;
use crate::api::session::CurrentSession;
use crate::domain::storyboard::{StoryboardFrame, StyleHints};
use crate::error::StudioError;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateStoryboardRequest {
    pub tone: Option<String>,
    #[validate(range(min = 1, message = "max_scenes must be at least 1"))]
    pub max_scenes: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct StoryboardResponse {
    pub frames: Vec<StoryboardFrame>,
}

/// Illustrate the session's screenplay one scene at a time
pub async fn generate_storyboard(
    State(state): State<StudioState>,
    current: CurrentSession,
    request: Option<ValidatedJson<GenerateStoryboardRequest>>,
) -> Result<Json<StoryboardResponse>, StudioError> {
    let request = request.map(|ValidatedJson(r)| r).unwrap_or_default();
    let hints = StyleHints {
        genre: None,
        tone: request.tone,
        max_scenes: request.max_scenes,
    };

    let stream = state.storyboard.frames(&current.session, hints)?;
    tokio::pin!(stream);

    let mut frames = Vec::new();
    while let Some(frame) = stream.next().await {
        frames.push(frame);
    }

    Ok(Json(StoryboardResponse { frames }))
}
