//! Project bible export through the HTTP surface

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use crate::common::{body_bytes, StudioTestApp};

async fn app_with_screenplay() -> StudioTestApp {
    let mut app = StudioTestApp::new();
    app.llm.behavior().set_reply("INT. OFFICE - DAY\n\nMiller waits.");
    let (status, _) = app
        .post_json(
            "/generate_screenplay",
            json!({"story": "A detective story", "genre": "Noir"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    app
}

#[tokio::test]
async fn test_export_without_content_is_plain_text_error() {
    let mut app = StudioTestApp::new();

    for uri in ["/export/pdf", "/export/docx", "/export/txt"] {
        let response = app.send(Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_bytes(response).await, b"No content to export");
    }
}

#[tokio::test]
async fn test_export_pdf_attachment() {
    let mut app = app_with_screenplay().await;

    let response = app.send(Method::GET, "/export/pdf", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"project_bible.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_export_docx_attachment() {
    let mut app = app_with_screenplay().await;
    app.post_empty("/generate_characters").await;

    let response = app.send(Method::GET, "/export/docx", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"project_bible.docx\""
    );
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn test_export_invalid_format() {
    let mut app = app_with_screenplay().await;

    for uri in ["/export/txt", "/export/PDF"] {
        let response = app.send(Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(response).await, b"Invalid format");
    }
}
