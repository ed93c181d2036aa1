//! Artifact generation through the HTTP surface

use axum::http::{header, Method, StatusCode};
use cinema_llm::{mock::MockOutcome, LlmError};
use serde_json::json;

use crate::common::{parse_body, StudioTestApp};

#[tokio::test]
async fn test_screenplay_sets_session_cookie() {
    let mut app = StudioTestApp::new();
    app.llm.behavior().set_reply("INT. DINER - NIGHT\n\nNeon hum.");

    let response = app
        .send(
            Method::POST,
            "/generate_screenplay",
            Some(json!({"story": "A heist gone wrong", "genre": "Thriller"})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("cinema_session="));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let body = parse_body(response).await;
    assert_eq!(body["content"], "INT. DINER - NIGHT\n\nNeon hum.");
    assert_eq!(body["fallback"], false);
}

#[tokio::test]
async fn test_screenplay_prompt_carries_optional_parameters() {
    let mut app = StudioTestApp::new();

    let (status, _) = app
        .post_json(
            "/generate_screenplay",
            json!({
                "story": "A lighthouse keeper",
                "genre": "drama",
                "language": "Spanish",
                "tone": "Melancholic",
                "scenes": 3
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let recorded = app.llm.recorded_requests();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].system_prompt.contains("DRAMA cinematic style"));
    assert!(recorded[0].system_prompt.contains("Tone: Melancholic"));
    assert!(recorded[0].system_prompt.contains("Number of scenes: 3"));
    assert_eq!(recorded[0].prompt, "Story idea: A lighthouse keeper");
}

#[tokio::test]
async fn test_invalid_screenplay_bodies_are_rejected() {
    let mut app = StudioTestApp::new();

    for body in [
        json!({"story": "", "genre": "Thriller"}),
        json!({"story": "A heist", "genre": ""}),
        json!({"story": "A heist", "genre": "Thriller", "scenes": 9}),
        json!({"genre": "Thriller"}),
    ] {
        let (status, body) = app.post_json("/generate_screenplay", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    assert!(app.llm.recorded_requests().is_empty());
    assert!(!app.has_session_cookie());
}

#[tokio::test]
async fn test_derived_artifacts_require_prerequisites() {
    let mut app = StudioTestApp::new();

    for (uri, message) in [
        ("/generate_characters", "No story found in session"),
        ("/generate_pitch_deck", "No story found in session"),
        ("/generate_director_mode", "No screenplay found in session"),
        ("/generate_sound_design", "No screenplay found in session"),
    ] {
        let (status, body) = app.post_empty(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": message}));
    }

    assert!(app.llm.recorded_requests().is_empty());
    assert!(!app.has_session_cookie());
}

#[tokio::test]
async fn test_full_session_flow() {
    let mut app = StudioTestApp::new();

    let (status, screenplay) = app
        .post_json(
            "/generate_screenplay",
            json!({"story": "A heist gone wrong", "genre": "Thriller"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, characters) = app.post_empty("/generate_characters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        characters["content"],
        "Mock response to: Based on this story idea: A heist gone wrong"
    );

    let (status, director) = app.post_empty("/generate_director_mode").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        director["content"],
        format!(
            "Mock response to: Screenplay: {}",
            screenplay["content"].as_str().unwrap()
        )
    );

    for uri in ["/generate_pitch_deck", "/generate_sound_design"] {
        let (status, _) = app.post_empty(uri).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, artifacts) = app.get_json("/artifacts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(artifacts["story"], "A heist gone wrong");
    assert_eq!(artifacts["genre"], "Thriller");
    assert_eq!(artifacts["artifacts"]["screenplay"], screenplay["content"]);
    for key in ["characters", "director_mode", "pitch_deck", "sound_design"] {
        assert!(artifacts["artifacts"][key].is_string(), "missing {}", key);
    }
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let mut app = StudioTestApp::new();
    app.post_json(
        "/generate_screenplay",
        json!({"story": "A heist", "genre": "Thriller"}),
    )
    .await;

    app.clear_cookie();
    let (status, body) = app.post_empty("/generate_characters").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No story found in session");
}

#[tokio::test]
async fn test_backend_failure_returns_fallback() {
    let mut app = StudioTestApp::new();
    app.llm
        .behavior()
        .set_outcome(MockOutcome::Fail(LlmError::Request("connection refused".to_string())));

    let (status, body) = app
        .post_json(
            "/generate_screenplay",
            json!({"story": "A heist", "genre": "Thriller"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);
    let content = body["content"].as_str().unwrap();
    assert!(content.contains("\"A heist\""));

    let (_, artifacts) = app.get_json("/artifacts").await;
    assert_eq!(artifacts["artifacts"]["screenplay"], content);
}

#[tokio::test]
async fn test_history_lists_newest_first() {
    let mut app = StudioTestApp::new();

    app.llm.behavior().set_reply("first draft");
    app.post_json("/generate_screenplay", json!({"story": "s", "genre": "g"}))
        .await;
    app.llm.behavior().set_reply("second draft");
    app.post_json("/generate_screenplay", json!({"story": "s", "genre": "g"}))
        .await;

    let (status, body) = app.get_json("/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["versions"], json!(["second draft", "first draft"]));
}

#[tokio::test]
async fn test_history_without_session_is_empty() {
    let mut app = StudioTestApp::new();
    let (status, body) = app.get_json("/history").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["versions"], json!([]));
    assert!(!app.has_session_cookie());
}
