//! Storyboard illustration through the HTTP surface

use axum::http::StatusCode;
use serde_json::json;

use crate::common::StudioTestApp;

const SCREENPLAY: &str =
    "INT. OFFICE - DAY\nMiller drinks.\n\nINT. ALLEY - NIGHT\nRain falls.\n\nINT. DOCKS - DAWN\nA boat leaves.";

async fn app_with_screenplay() -> StudioTestApp {
    let mut app = StudioTestApp::new();
    app.llm.behavior().set_reply(SCREENPLAY);
    app.post_json(
        "/generate_screenplay",
        json!({"story": "A detective story", "genre": "Noir"}),
    )
    .await;
    app
}

#[tokio::test]
async fn test_storyboard_requires_screenplay() {
    let mut app = StudioTestApp::new();
    let (status, body) = app.post_json("/generate_storyboard", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No screenplay found in session");
    assert!(app.images.recorded_requests().is_empty());
}

#[tokio::test]
async fn test_storyboard_frames_follow_scene_order() {
    let mut app = app_with_screenplay().await;

    let (status, body) = app.post_json("/generate_storyboard", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let frames = body["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 3);
    for (index, heading) in ["INT. OFFICE", "INT. ALLEY", "INT. DOCKS"].iter().enumerate() {
        assert_eq!(frames[index]["scene"], index + 1);
        let prompt = frames[index]["prompt"].as_str().unwrap();
        assert!(prompt.starts_with("Cinematic storyboard frame, Noir film, cinematic tone."));
        assert!(prompt.contains(heading));
        assert_eq!(
            frames[index]["image_url"],
            format!("https://mock-images.example.com/storyboard/{}.png", index + 1)
        );
    }
}

#[tokio::test]
async fn test_storyboard_honours_tone_and_limit() {
    let mut app = app_with_screenplay().await;

    let (status, body) = app
        .post_json(
            "/generate_storyboard",
            json!({"tone": "Gritty", "max_scenes": 2}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let frames = body["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 2);
    assert!(frames[0]["prompt"].as_str().unwrap().contains("Gritty tone."));
    assert_eq!(app.images.recorded_requests().len(), 2);
}

#[tokio::test]
async fn test_failed_frame_is_reported_inline() {
    let mut app = app_with_screenplay().await;
    app.images.behavior().fail_request(1);

    let (status, body) = app.post_json("/generate_storyboard", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let frames = body["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 3);
    assert!(frames[1]["image_url"].is_null());
    assert!(frames[1]["error"].as_str().unwrap().contains("Mock image failure"));
    assert!(frames[2]["image_url"].is_string());
}

#[tokio::test]
async fn test_storyboard_accepts_bodyless_post() {
    let mut app = app_with_screenplay().await;

    let (status, body) = app.post_empty("/generate_storyboard").await;
    assert_eq!(status, StatusCode::OK);

    let frames = body["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 3);
    assert!(frames[0]["prompt"].as_str().unwrap().contains("cinematic tone."));
}

#[tokio::test]
async fn test_storyboard_body_is_still_validated() {
    let mut app = app_with_screenplay().await;

    let (status, body) = app
        .post_json("/generate_storyboard", json!({"max_scenes": 0}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(app.images.recorded_requests().is_empty());
}
