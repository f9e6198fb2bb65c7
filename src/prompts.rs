//! Prompt construction for quiz generation.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the instruction wording (e.g.
//!    tightening the JSON-only rule after a new model quirk) requires
//!    editing exactly one place.
//!
//! 2. **Testability** — unit tests can build and inspect prompts directly
//!    without spinning up a real model, so format regressions are caught
//!    before they reach the normaliser.

use crate::config::QuizConfig;
use crate::error::QuizGenError;
use tracing::debug;

/// System instruction sent with every completion request.
///
/// Kept short and absolute: models comply with "JSON only" far more
/// reliably when it is the entire system turn rather than one rule among
/// many.
pub const SYSTEM_PROMPT: &str =
    "You are an expert quiz generator. Always respond with valid JSON only.";

/// Build the user-turn instruction payload for the generative model.
///
/// Fails with [`QuizGenError::InsufficientContent`] when the trimmed text is
/// below the configured minimum. Text beyond `max_excerpt_chars` is dropped
/// by deterministic prefix truncation — lossy by design, to keep the prompt
/// inside the model's input budget; the cut is logged, not an error.
///
/// The payload requests exactly `question_count` questions, four options
/// each with one correct index, and mandates a bare JSON array with no
/// surrounding prose or markdown fencing. The excerpt is embedded verbatim.
pub fn build_prompt(
    text: &str,
    question_count: usize,
    config: &QuizConfig,
) -> Result<String, QuizGenError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < config.min_content_chars {
        return Err(QuizGenError::InsufficientContent {
            len,
            min: config.min_content_chars,
        });
    }

    let excerpt = truncate_chars(trimmed, config.max_excerpt_chars);
    if excerpt.len() < trimmed.len() {
        debug!(
            total_chars = len,
            excerpt_chars = config.max_excerpt_chars,
            "Truncating document text to excerpt"
        );
    }

    Ok(format!(
        r#"Based on the following text, generate exactly {question_count} multiple-choice questions.
Each question must have 4 options and test understanding of the key concepts.

IMPORTANT: Return ONLY a JSON array (not an object). The response must start with [ and end with ].

Use this exact format:
[
    {{
        "question": "Question text here?",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "correctAnswer": 0
    }}
]

Make sure:
- Questions test comprehension, not just memorization
- All 4 options are plausible
- The correctAnswer index (0-3) points to the correct option
- Questions are clear and unambiguous
- Return ONLY the JSON array, no additional text or formatting

Text to analyze:
{excerpt}"#
    ))
}

/// Truncate to at most `max` characters on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
