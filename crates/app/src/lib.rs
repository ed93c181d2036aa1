//! Coffee-with-Cinema application composition root
//!
//! Builds the providers from the environment and mounts the Studio router.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    Router,
};
use cinema_llm::{LlmConfig, LlmService, LlmServiceFactory};
use cinema_replicate::{ImageConfig, ImageService, ImageServiceFactory};
use cinema_studio::{StudioConfig, StudioState};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Request bodies carry story text only
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router from environment configuration
pub fn create_app() -> Result<Router, anyhow::Error> {
    let llm_config = LlmConfig::from_env()?;
    let llm = LlmServiceFactory::create(llm_config)?;

    let image_config = ImageConfig::from_env()?;
    let images = ImageServiceFactory::create(image_config)?;

    let studio_config = StudioConfig::from_env()?;

    Ok(build_router(
        Arc::from(llm),
        Arc::from(images),
        studio_config,
    ))
}

/// Compose the Studio routes with the shared infrastructure routes
pub fn build_router(
    llm: Arc<dyn LlmService>,
    images: Arc<dyn ImageService>,
    config: StudioConfig,
) -> Router {
    let studio_state = StudioState::new(llm, images, config);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Coffee-with-Cinema API v0.1.0" }),
        )
        .merge(cinema_studio::routes().with_state(studio_state))
}

/// CORS for the browser front-end; permissive when no origins are configured
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use cinema_llm::mock::MockLlmService;
    use cinema_replicate::mock::MockImageService;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(
            Arc::new(MockLlmService::new()),
            Arc::new(MockImageService::new()),
            StudioConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = app().layer(build_cors_layer(Some("http://localhost:5000, bad\norigin")));
        let response = app
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://localhost:5000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5000"
        );
    }
}
