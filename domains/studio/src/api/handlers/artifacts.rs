//! Artifact generation and session read handlers

use std::collections::BTreeMap;

use axum::{extract::State, response::IntoResponse, Json};
use cinema_common::ValidatedJson;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::StudioState;
use crate::api::session::{with_cookie, CurrentSession};
use crate::domain::entities::{DerivedKind, ScreenplayParams};
use crate::domain::pipeline::Generated;
use crate::error::StudioError;

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateScreenplayRequest {
    #[validate(length(min = 1, message = "story is required"))]
    pub story: String,
    #[validate(length(min = 1, message = "genre is required"))]
    pub genre: String,
    pub language: Option<String>,
    pub tone: Option<String>,
    /// Requested number of scenes
    #[validate(range(min = 1, max = 6, message = "scenes must be between 1 and 6"))]
    pub scenes: Option<u8>,
}

impl From<GenerateScreenplayRequest> for ScreenplayParams {
    fn from(request: GenerateScreenplayRequest) -> Self {
        Self {
            story: request.story,
            genre: request.genre,
            language: request.language,
            tone: request.tone,
            scene_count: request.scenes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
    pub fallback: bool,
}

impl From<Generated> for ContentResponse {
    fn from(generated: Generated) -> Self {
        Self {
            content: generated.content,
            fallback: generated.fallback,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Screenplay versions, newest first
    pub versions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactsResponse {
    pub story: Option<String>,
    pub genre: Option<String>,
    pub artifacts: BTreeMap<&'static str, String>,
}

pub async fn generate_screenplay(
    State(state): State<StudioState>,
    mut current: CurrentSession,
    ValidatedJson(request): ValidatedJson<GenerateScreenplayRequest>,
) -> Result<impl IntoResponse, StudioError> {
    let generated = state
        .pipeline
        .generate_screenplay(&mut current.session, request.into())
        .await?;

    let cookie = current.commit(state.sessions.as_ref()).await?;
    Ok(with_cookie(cookie, Json(ContentResponse::from(generated))))
}

async fn generate_derived(
    state: StudioState,
    mut current: CurrentSession,
    kind: DerivedKind,
) -> Result<impl IntoResponse, StudioError> {
    let generated = state
        .pipeline
        .generate_derived(&mut current.session, kind)
        .await?;

    let cookie = current.commit(state.sessions.as_ref()).await?;
    Ok(with_cookie(cookie, Json(ContentResponse::from(generated))))
}

pub async fn generate_characters(
    State(state): State<StudioState>,
    current: CurrentSession,
) -> Result<impl IntoResponse, StudioError> {
    generate_derived(state, current, DerivedKind::Characters).await
}

pub async fn generate_director_mode(
    State(state): State<StudioState>,
    current: CurrentSession,
) -> Result<impl IntoResponse, StudioError> {
    generate_derived(state, current, DerivedKind::DirectorMode).await
}

pub async fn generate_pitch_deck(
    State(state): State<StudioState>,
    current: CurrentSession,
) -> Result<impl IntoResponse, StudioError> {
    generate_derived(state, current, DerivedKind::PitchDeck).await
}

pub async fn generate_sound_design(
    State(state): State<StudioState>,
    current: CurrentSession,
) -> Result<impl IntoResponse, StudioError> {
    generate_derived(state, current, DerivedKind::SoundDesign).await
}

pub async fn get_history(current: CurrentSession) -> Json<HistoryResponse> {
    let versions = current.session.history.iter().rev().cloned().collect();
    Json(HistoryResponse { versions })
}

pub async fn get_artifacts(current: CurrentSession) -> Json<ArtifactsResponse> {
    let session = current.session;
    let artifacts = session
        .artifacts()
        .map(|(kind, text)| (kind.key(), text.to_string()))
        .collect();

    Json(ArtifactsResponse {
        story: session.story,
        genre: session.genre,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(story: &str, genre: &str, scenes: Option<u8>) -> GenerateScreenplayRequest {
        GenerateScreenplayRequest {
            story: story.to_string(),
            genre: genre.to_string(),
            language: None,
            tone: None,
            scenes,
        }
    }

    #[test]
    fn test_screenplay_request_validation() {
        assert!(request("A heist", "Thriller", Some(3)).validate().is_ok());
        assert!(request("A heist", "Thriller", None).validate().is_ok());
        assert!(request("", "Thriller", None).validate().is_err());
        assert!(request("A heist", "", None).validate().is_err());
        assert!(request("A heist", "Thriller", Some(0)).validate().is_err());
        assert!(request("A heist", "Thriller", Some(7)).validate().is_err());
    }

    #[test]
    fn test_request_maps_scenes_to_scene_count() {
        let params: ScreenplayParams = request("A heist", "Thriller", Some(4)).into();
        assert_eq!(params.scene_count, Some(4));
        assert_eq!(params.story, "A heist");
    }
}
