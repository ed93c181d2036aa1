//! Studio domain errors and their HTTP mapping

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::export::ExportError;
use crate::repository::StoreError;

#[derive(Debug, Error)]
pub enum StudioError {
    /// A derived artifact was requested before the value it is built from
    #[error("{0}")]
    MissingPrerequisite(&'static str),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Common(#[from] cinema_common::Error),
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        match self {
            StudioError::MissingPrerequisite(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            StudioError::Export(err @ (ExportError::EmptyContent | ExportError::UnsupportedFormat(_))) => (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                err.to_string(),
            )
                .into_response(),
            StudioError::Export(err) => {
                cinema_common::Error::Internal(err.to_string()).into_response()
            }
            StudioError::Store(err) => {
                cinema_common::Error::Internal(err.to_string()).into_response()
            }
            StudioError::Common(err) => err.into_response(),
        }
    }
}
