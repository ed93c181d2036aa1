//! Project bible export handler

use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};

use crate::api::middleware::StudioState;
use crate::api::session::CurrentSession;
use crate::error::StudioError;

/// Serve the session's artifacts as a PDF or DOCX attachment
pub async fn export_bundle(
    State(state): State<StudioState>,
    current: CurrentSession,
    Path(format): Path<String>,
) -> Result<impl IntoResponse, StudioError> {
    let document = state.exporter.export(&current.session, &format)?;

    let headers = [
        (CONTENT_TYPE, document.content_type.to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ),
    ];

    Ok((headers, document.content))
}
