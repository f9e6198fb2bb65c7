//! Error types for the quizgen library.
//!
//! Every variant of [`QuizGenError`] is request-scoped: a failure classifies
//! one pipeline invocation and is never fatal to the process. The taxonomy
//! follows the pipeline stages — upload validation, extraction, prompt
//! construction, the upstream call, response normalisation, scoring — so the
//! HTTP layer can map each class to a stable status code and error code
//! without inspecting message text.
//!
//! Diagnostic strings for parse failures embed the offending raw model text
//! (truncated — the upstream is non-deterministic and the raw text is the
//! only way to debug a bad batch) but never credentials: the API key lives
//! only in the request header built by the client adapter and is not part of
//! any error context.

use thiserror::Error;

/// All request-scoped errors returned by the quizgen library.
#[derive(Debug, Error)]
pub enum QuizGenError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// The declared content type is not the supported document format.
    #[error("Unsupported content type '{content_type}': only application/pdf is accepted")]
    UnsupportedFormat { content_type: String },

    /// The upload exceeds the configured size ceiling. Checked before any
    /// parsing so oversized payloads are rejected cheaply.
    #[error("Upload of {size} bytes exceeds the {limit}-byte limit")]
    SizeLimitExceeded { size: usize, limit: usize },

    /// The bytes could not be parsed as a PDF.
    #[error("Failed to extract text from PDF: {detail}")]
    ExtractionFailed { detail: String },

    /// Extraction succeeded but produced no text (scanned/image-only PDF).
    #[error("No extractable text found in the document")]
    EmptyDocument,

    // ── Prompt errors ─────────────────────────────────────────────────────
    /// The extracted text carries too little signal for meaningful questions.
    #[error("Document text is too short to generate meaningful questions ({len} chars, need at least {min})")]
    InsufficientContent { len: usize, min: usize },

    // ── Upstream errors ───────────────────────────────────────────────────
    /// The generative API could not be reached, rejected the credentials,
    /// or returned a non-success status after retries.
    #[error("Generative API unavailable: {detail}")]
    UpstreamUnavailable { detail: String },

    /// The model's output was not parseable as JSON at all.
    #[error("Model response is not valid JSON ({detail}); offending text: {raw}")]
    MalformedResponse { detail: String, raw: String },

    /// The model returned an explicit error payload instead of questions.
    #[error("Model returned an error payload: {detail}")]
    UpstreamModelError { detail: String },

    /// The parsed JSON was neither an array nor a recoverable object shape.
    #[error("Unexpected response shape: expected a question array, got an object with keys [{keys}]")]
    UnexpectedResponseShape { keys: String },

    /// One element of the question array is not a usable question record.
    #[error("Question {index} is invalid: {detail}")]
    InvalidQuestionRecord { index: usize, detail: String },

    /// A question record is missing one of its required fields.
    #[error("Question {index} is missing required field '{field}'")]
    MissingField { index: usize, field: String },

    // ── Scoring errors ────────────────────────────────────────────────────
    /// A submitted answer references an id not present in the question set.
    #[error("Answer references unknown question id '{id}'")]
    UnknownQuestionId { id: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_display() {
        let e = QuizGenError::SizeLimitExceeded {
            size: 11_000_000,
            limit: 10_485_760,
        };
        let msg = e.to_string();
        assert!(msg.contains("11000000"), "got: {msg}");
        assert!(msg.contains("10485760"), "got: {msg}");
    }

    #[test]
    fn missing_field_names_field_and_index() {
        let e = QuizGenError::MissingField {
            index: 2,
            field: "correctAnswer".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Question 2"));
        assert!(msg.contains("correctAnswer"));
    }

    #[test]
    fn malformed_response_carries_raw_text() {
        let e = QuizGenError::MalformedResponse {
            detail: "expected value at line 1".into(),
            raw: "Sure! Here are your questions:".into(),
        };
        assert!(e.to_string().contains("Here are your questions"));
    }

    #[test]
    fn unexpected_shape_names_keys() {
        let e = QuizGenError::UnexpectedResponseShape {
            keys: "quiz, meta".into(),
        };
        assert!(e.to_string().contains("quiz, meta"));
    }
}
