//! Response normalisation: raw model text → validated questions.
//!
//! ## Why is this the most defensive code in the crate?
//!
//! The generative model's output is free text with no structural guarantee.
//! Even well-prompted models routinely:
//!
//! - wrap the array in ` ```json ... ``` ` fences despite the prompt saying
//!   not to
//! - return `{"questions": [...]}` or `{"data": [...]}` instead of a bare
//!   array
//! - return a single question object when asked for one question
//! - return `{"error": "..."}` when the provider intercepts the request
//!
//! Each of those shapes is handled by a named recovery step tried in a fixed
//! order. A new model quirk becomes one new step, not a rewrite of nested
//! conditionals. Anything unrecoverable fails the whole batch — a partially
//! valid quiz is worse than a clean, retryable error.

use crate::error::QuizGenError;
use crate::question::Question;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

/// Object keys that commonly wrap the question array, in recovery order.
const WRAPPER_KEYS: [&str; 3] = ["questions", "data", "items"];

/// Cap on raw model text quoted inside error diagnostics.
const RAW_SNIPPET_CHARS: usize = 500;

/// Parse and validate the model's raw output into a question list.
///
/// Algorithm, in order:
/// 1. Strip markdown code fences (with optional `json` tag) and trim.
/// 2. Parse as JSON → [`QuizGenError::MalformedResponse`] on failure.
/// 3. If the value is an object, run the ordered recovery steps
///    (error payload, wrapper keys, single-record promotion).
/// 4. Require an array → [`QuizGenError::UnexpectedResponseShape`] otherwise.
/// 5. Validate every element into a [`Question`] with a freshly generated
///    id. All-or-nothing: the first bad element fails the batch.
pub fn normalize_response(raw: &str) -> Result<Vec<Question>, QuizGenError> {
    let cleaned = strip_code_fence(raw);

    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| QuizGenError::MalformedResponse {
            detail: e.to_string(),
            raw: raw_snippet(raw),
        })?;

    let value = match value {
        Value::Object(map) => recover_object(map)?,
        other => other,
    };

    let records = match value {
        Value::Array(records) => records,
        other => {
            return Err(QuizGenError::UnexpectedResponseShape {
                keys: format!("<{}>", json_type_name(&other)),
            })
        }
    };

    let questions = records
        .iter()
        .enumerate()
        .map(|(index, record)| build_question(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = questions.len(), "Normalised model response");
    Ok(questions)
}

// ── Step 1: fence stripping ──────────────────────────────────────────────

static RE_FENCE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json)?[ \t]*\n?").unwrap());
static RE_FENCE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n?```\s*$").unwrap());

/// Undo the model's markdown habit without depending on it: remove one
/// leading and one trailing triple-backtick fence if present, then trim.
fn strip_code_fence(input: &str) -> &str {
    let trimmed = input.trim();
    let without_open = match RE_FENCE_OPEN.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    let without_close = match RE_FENCE_CLOSE.find(without_open) {
        Some(m) => &without_open[..m.start()],
        None => without_open,
    };
    without_close.trim()
}

// ── Step 3: object-shape recovery ────────────────────────────────────────

/// Ordered recovery for object-shaped responses. Steps are tried in
/// sequence; the first that applies decides the outcome.
fn recover_object(map: Map<String, Value>) -> Result<Value, QuizGenError> {
    // Step 3a: explicit error payload from the provider or model.
    if let Some(err) = map.get("error") {
        return Err(QuizGenError::UpstreamModelError {
            detail: stringify(err),
        });
    }

    // Step 3b: the array hidden behind a common wrapper key.
    for key in WRAPPER_KEYS {
        if let Some(inner) = map.get(key) {
            debug!(wrapper = key, "Recovered question array from wrapper object");
            return Ok(inner.clone());
        }
    }

    // Step 3c: a lone question record, promoted to a single-element list.
    if map.contains_key("question") && map.contains_key("options") {
        debug!("Promoted single question object to a one-element list");
        return Ok(Value::Array(vec![Value::Object(map)]));
    }

    // No step applied: name the keys so the log shows what the model did.
    Err(QuizGenError::UnexpectedResponseShape {
        keys: map.keys().cloned().collect::<Vec<_>>().join(", "),
    })
}

// ── Step 5: per-record validation ────────────────────────────────────────

fn build_question(index: usize, record: &Value) -> Result<Question, QuizGenError> {
    let record = record
        .as_object()
        .ok_or_else(|| QuizGenError::InvalidQuestionRecord {
            index,
            detail: format!("expected an object, got {}", json_type_name(record)),
        })?;

    let question = require_field(record, "question", index)?
        .as_str()
        .ok_or_else(|| invalid(index, "field 'question' must be a string"))?;

    let options = require_field(record, "options", index)?
        .as_array()
        .ok_or_else(|| invalid(index, "field 'options' must be an array"))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(index, "every option must be a string"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let correct_answer = require_field(record, "correctAnswer", index)?
        .as_u64()
        .ok_or_else(|| invalid(index, "field 'correctAnswer' must be a non-negative integer"))?
        as usize;

    Question::new(question, options, correct_answer)
        .map_err(|detail| QuizGenError::InvalidQuestionRecord { index, detail })
}

fn require_field<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
    index: usize,
) -> Result<&'a Value, QuizGenError> {
    record.get(field).ok_or(QuizGenError::MissingField {
        index,
        field: field.to_string(),
    })
}

fn invalid(index: usize, detail: &str) -> QuizGenError {
    QuizGenError::InvalidQuestionRecord {
        index,
        detail: detail.to_string(),
    }
}

// ── Diagnostics helpers ──────────────────────────────────────────────────

/// Render a JSON value for an error message without quoting plain strings.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Bound the raw text quoted in diagnostics; upstream output is unbounded.
fn raw_snippet(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= RAW_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(RAW_SNIPPET_CHARS).collect();
        format!("{cut} …(truncated)")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_ARRAY: &str = r#"[
        {"question": "What is Rust?", "options": ["A language", "A fungus", "A game", "A car"], "correctAnswer": 0},
        {"question": "What is cargo?", "options": ["A ship", "A build tool", "A crate", "A port"], "correctAnswer": 1}
    ]"#;

    #[test]
    fn round_trip_preserves_order_and_content() {
        let questions = normalize_response(VALID_ARRAY).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "What is Rust?");
        assert_eq!(questions[0].options[1], "A fungus");
        assert_eq!(questions[0].correct_answer, 0);
        assert_eq!(questions[1].question, "What is cargo?");
        assert_eq!(questions[1].correct_answer, 1);
    }

    #[test]
    fn generated_ids_are_unique() {
        let questions = normalize_response(VALID_ARRAY).unwrap();
        assert_ne!(questions[0].id, questions[1].id);
        assert!(!questions[0].id.is_empty());
    }

    #[test]
    fn fenced_input_parses_identically() {
        let bare = normalize_response(VALID_ARRAY).unwrap();
        let fenced = normalize_response(&format!("```json\n{VALID_ARRAY}\n```")).unwrap();
        let fenced_no_tag = normalize_response(&format!("```\n{VALID_ARRAY}\n```")).unwrap();
        for set in [&fenced, &fenced_no_tag] {
            assert_eq!(set.len(), bare.len());
            for (a, b) in bare.iter().zip(set.iter()) {
                assert_eq!(a.question, b.question);
                assert_eq!(a.options, b.options);
                assert_eq!(a.correct_answer, b.correct_answer);
            }
        }
    }

    #[test]
    fn wrapper_objects_recover_to_the_same_set() {
        let bare = normalize_response(VALID_ARRAY).unwrap();
        for wrapper in ["questions", "data", "items"] {
            let wrapped = format!(r#"{{"{wrapper}": {VALID_ARRAY}}}"#);
            let set = normalize_response(&wrapped).unwrap();
            assert_eq!(set.len(), bare.len(), "wrapper key: {wrapper}");
            assert_eq!(set[0].question, bare[0].question);
        }
    }

    #[test]
    fn single_question_object_is_promoted() {
        let single = r#"{"question": "Lone?", "options": ["a","b","c","d"], "correctAnswer": 3}"#;
        let questions = normalize_response(single).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Lone?");
        assert_eq!(questions[0].correct_answer, 3);
    }

    #[test]
    fn error_payload_surfaces_as_upstream_model_error() {
        let err = normalize_response(r#"{"error": "rate limited"}"#).unwrap_err();
        match err {
            QuizGenError::UpstreamModelError { detail } => {
                assert_eq!(detail, "rate limited")
            }
            other => panic!("expected UpstreamModelError, got {other:?}"),
        }
    }

    #[test]
    fn unknown_object_shape_names_keys() {
        let err = normalize_response(r#"{"quiz": [], "meta": {}}"#).unwrap_err();
        match err {
            QuizGenError::UnexpectedResponseShape { keys } => {
                assert!(keys.contains("quiz"), "got keys: {keys}");
                assert!(keys.contains("meta"), "got keys: {keys}");
            }
            other => panic!("expected UnexpectedResponseShape, got {other:?}"),
        }
    }

    #[test]
    fn scalar_json_is_an_unexpected_shape() {
        let err = normalize_response("42").unwrap_err();
        assert!(matches!(err, QuizGenError::UnexpectedResponseShape { .. }));
    }

    #[test]
    fn non_json_text_is_malformed() {
        let err = normalize_response("Sorry, I can't help with that.").unwrap_err();
        match err {
            QuizGenError::MalformedResponse { raw, .. } => {
                assert!(raw.contains("Sorry"), "raw snippet missing: {raw}")
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn missing_correct_answer_names_field_and_index() {
        let input = r#"[
            {"question": "Ok?", "options": ["a","b","c","d"], "correctAnswer": 0},
            {"question": "Broken?", "options": ["a","b","c","d"]}
        ]"#;
        let err = normalize_response(input).unwrap_err();
        match err {
            QuizGenError::MissingField { index, field } => {
                assert_eq!(index, 1);
                assert_eq!(field, "correctAnswer");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn non_object_element_is_index_qualified() {
        let err = normalize_response(r#"[ "just a string" ]"#).unwrap_err();
        assert!(matches!(
            err,
            QuizGenError::InvalidQuestionRecord { index: 0, .. }
        ));
    }

    #[test]
    fn out_of_range_correct_answer_is_rejected() {
        let input =
            r#"[{"question": "Q?", "options": ["a","b","c","d"], "correctAnswer": 7}]"#;
        let err = normalize_response(input).unwrap_err();
        assert!(matches!(
            err,
            QuizGenError::InvalidQuestionRecord { index: 0, .. }
        ));
    }

    #[test]
    fn wrong_option_count_is_rejected() {
        let input = r#"[{"question": "Q?", "options": ["a","b"], "correctAnswer": 0}]"#;
        let err = normalize_response(input).unwrap_err();
        assert!(matches!(
            err,
            QuizGenError::InvalidQuestionRecord { index: 0, .. }
        ));
    }

    #[test]
    fn one_bad_record_fails_the_whole_batch() {
        let input = r#"[
            {"question": "Fine?", "options": ["a","b","c","d"], "correctAnswer": 0},
            {"question": 42, "options": ["a","b","c","d"], "correctAnswer": 0}
        ]"#;
        assert!(normalize_response(input).is_err());
    }

    #[test]
    fn fence_stripping_is_a_noop_without_fences() {
        assert_eq!(strip_code_fence("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn raw_snippet_is_bounded() {
        let long = "x".repeat(2000);
        let snippet = raw_snippet(&long);
        assert!(snippet.chars().count() < 600);
        assert!(snippet.ends_with("…(truncated)"));
    }
}
