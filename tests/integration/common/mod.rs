//! Common test utilities for integration tests
//!
//! Provides a router wired to programmable mock backends plus request and
//! response helpers that carry the session cookie between calls.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use cinema_llm::mock::MockLlmService;
use cinema_replicate::mock::MockImageService;
use cinema_studio::StudioConfig;
use serde_json::Value;
use tower::ServiceExt;

/// Test application with handles on its mock backends
pub struct StudioTestApp {
    pub llm: MockLlmService,
    pub images: MockImageService,
    router: Router,
    cookie: Option<String>,
}

impl StudioTestApp {
    pub fn new() -> Self {
        Self::with_config(StudioConfig::default())
    }

    pub fn with_config(config: StudioConfig) -> Self {
        let llm = MockLlmService::new();
        let images = MockImageService::new();
        let router = cinema_app::build_router(
            Arc::new(llm.clone()),
            Arc::new(images.clone()),
            config,
        );

        Self {
            llm,
            images,
            router,
            cookie: None,
        }
    }

    /// Send a request, attaching the session cookie once one has been issued
    pub async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.as_str());
        }

        let request = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_string(&b).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            self.cookie = Some(pair);
        }

        response
    }

    pub async fn post_json(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self.send(Method::POST, uri, Some(body)).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn post_empty(&mut self, uri: &str) -> (StatusCode, Value) {
        let response = self.send(Method::POST, uri, None).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get_json(&mut self, uri: &str) -> (StatusCode, Value) {
        let response = self.send(Method::GET, uri, None).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub fn has_session_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// Forget the session cookie, as a new browser would
    pub fn clear_cookie(&mut self) {
        self.cookie = None;
    }
}

/// Parse response body as JSON Value
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = body_bytes(response).await;
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
