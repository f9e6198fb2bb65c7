//! HTTP transport: a composable axum `Router` over the quiz pipeline.
//!
//! The transport owns multipart decoding, JSON body decoding, the liveness
//! probe, and CORS — the pipeline itself only ever sees raw bytes plus a
//! declared content type. Handlers return `Result<Json<T>, ApiError>` and
//! the error type carries the status-code mapping, so the routing table
//! stays free of error-handling noise.

pub mod error;
pub mod handlers;

use crate::config::QuizConfig;
use crate::pipeline::llm::TextGenerator;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Extra body budget above the configured upload ceiling, covering
/// multipart boundaries and headers so the pipeline's own size check is the
/// one that fires, not the transport's 413.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared per-process state handed to every handler.
///
/// Both fields are immutable after startup; concurrent requests share them
/// without coordination.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<QuizConfig>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: QuizConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            generator,
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/generate-questions", post(handlers::generate_questions))
        .route("/submit-quiz", post(handlers::submit_quiz))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
///
/// A literal `"*"` anywhere in the list means any origin; otherwise only
/// the origins that parse as valid header values are allowed. Methods and
/// headers are unrestricted either way — the API carries no credentials,
/// so CORS only scopes which browsers may call it.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}
