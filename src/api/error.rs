//! API error type with structured JSON responses.
//!
//! Every pipeline failure maps to a stable machine-readable code plus a
//! human diagnostic: `{"error": {"code": "...", "message": "..."}}`.
//! Input-side failures are the client's problem (400); upstream and
//! model-output failures are a bad gateway (502) — the server is healthy,
//! the thing behind it misbehaved.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::QuizGenError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed transport-level input (bad multipart body, missing file
    /// field, out-of-range query parameter).
    BadRequest(String),
    /// A classified pipeline failure.
    Quiz(QuizGenError),
}

impl From<QuizGenError> for ApiError {
    fn from(err: QuizGenError) -> Self {
        ApiError::Quiz(err)
    }
}

/// Stable code + status for each pipeline error class.
fn classify(err: &QuizGenError) -> (StatusCode, &'static str) {
    use QuizGenError::*;
    match err {
        UnsupportedFormat { .. } => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT"),
        SizeLimitExceeded { .. } => (StatusCode::BAD_REQUEST, "SIZE_LIMIT_EXCEEDED"),
        ExtractionFailed { .. } => (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED"),
        EmptyDocument => (StatusCode::BAD_REQUEST, "EMPTY_DOCUMENT"),
        InsufficientContent { .. } => (StatusCode::BAD_REQUEST, "INSUFFICIENT_CONTENT"),
        UnknownQuestionId { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_QUESTION_ID"),
        UpstreamUnavailable { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
        MalformedResponse { .. } => (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE"),
        UpstreamModelError { .. } => (StatusCode::BAD_GATEWAY, "UPSTREAM_MODEL_ERROR"),
        UnexpectedResponseShape { .. } => (StatusCode::BAD_GATEWAY, "UNEXPECTED_RESPONSE_SHAPE"),
        InvalidQuestionRecord { .. } => (StatusCode::BAD_GATEWAY, "INVALID_QUESTION_RECORD"),
        MissingField { .. } => (StatusCode::BAD_GATEWAY, "MISSING_FIELD"),
        InvalidConfig(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Quiz(err) => {
                let (status, code) = classify(err);
                if status.is_server_error() {
                    tracing::warn!(code, error = %err, "Request failed");
                }
                (status, code, err.to_string())
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn unsupported_format_returns_400() {
        let err = ApiError::from(QuizGenError::UnsupportedFormat {
            content_type: "text/plain".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "UNSUPPORTED_FORMAT");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("text/plain"));
    }

    #[tokio::test]
    async fn malformed_response_returns_502() {
        let err = ApiError::from(QuizGenError::MalformedResponse {
            detail: "expected value".into(),
            raw: "nope".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "MALFORMED_RESPONSE");
    }

    #[tokio::test]
    async fn unknown_question_id_returns_400() {
        let err = ApiError::from(QuizGenError::UnknownQuestionId { id: "x".into() });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_request_carries_detail() {
        let response = ApiError::BadRequest("missing 'file' field".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("file"));
    }
}
