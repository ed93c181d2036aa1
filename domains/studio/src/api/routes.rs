//! Route definitions for Studio domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{artifacts, export, storyboard};
use super::middleware::StudioState;

/// Create all Studio domain API routes
pub fn routes() -> Router<StudioState> {
    Router::new()
        .route("/generate_screenplay", post(artifacts::generate_screenplay))
        .route("/generate_characters", post(artifacts::generate_characters))
        .route(
            "/generate_director_mode",
            post(artifacts::generate_director_mode),
        )
        .route("/generate_pitch_deck", post(artifacts::generate_pitch_deck))
        .route(
            "/generate_sound_design",
            post(artifacts::generate_sound_design),
        )
        .route("/generate_storyboard", post(storyboard::generate_storyboard))
        .route("/history", get(artifacts::get_history))
        .route("/artifacts", get(artifacts::get_artifacts))
        .route("/export/{format}", get(export::export_bundle))
}
