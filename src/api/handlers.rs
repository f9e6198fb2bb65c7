//! Endpoint handlers: multipart/JSON decoding in, typed pipeline calls out.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::config::MAX_QUESTION_COUNT;
use crate::generate::generate_quiz;
use crate::question::{QuestionSet, QuizSubmission, ScoringResult};
use crate::scoring::score_submission;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// `GET /health` — static liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "quizgen",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub num_questions: Option<usize>,
}

/// `POST /generate-questions` — multipart upload in, question set out.
///
/// Expects the document in a `file` field; an optional `num_questions`
/// query parameter (1–20) overrides the configured default.
pub async fn generate_questions(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
    mut multipart: Multipart,
) -> Result<Json<QuestionSet>, ApiError> {
    let question_count = match params.num_questions {
        Some(n) if (1..=MAX_QUESTION_COUNT).contains(&n) => n,
        Some(n) => {
            return Err(ApiError::BadRequest(format!(
                "num_questions must be 1-{MAX_QUESTION_COUNT}, got {n}"
            )))
        }
        None => state.config.question_count,
    };

    let mut upload: Option<(Vec<u8>, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
            upload = Some((bytes.to_vec(), content_type));
            break;
        }
    }

    let (bytes, content_type) = upload
        .ok_or_else(|| ApiError::BadRequest("missing 'file' field in multipart body".into()))?;

    info!(
        bytes = bytes.len(),
        %content_type,
        question_count,
        "Received generation request"
    );

    let set = generate_quiz(
        bytes,
        &content_type,
        question_count,
        &state.config,
        &state.generator,
    )
    .await?;

    Ok(Json(set))
}

/// `POST /submit-quiz` — JSON submission in, scoring result out.
pub async fn submit_quiz(
    Json(submission): Json<QuizSubmission>,
) -> Result<Json<ScoringResult>, ApiError> {
    let result = score_submission(&submission)?;
    info!(
        score = result.score,
        total = result.total_questions,
        "Scored submission"
    );
    Ok(Json(result))
}
