//! Quiz data model: questions, submissions, and scoring results.
//!
//! Wire field names are camelCase because the JSON contract predates this
//! implementation; serde renames keep the Rust side idiomatic.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every question carries exactly this many answer options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A single multiple-choice question.
///
/// Constructed only by [`Question::new`], which generates the id locally —
/// the model never supplies identifiers, so uniqueness within a set cannot
/// depend on upstream behaviour — and enforces the shape invariant:
/// exactly [`OPTIONS_PER_QUESTION`] options and an in-range correct index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

impl Question {
    /// Build a question with a freshly generated unique id, validating the
    /// shape invariant. The error string is the human-readable detail; the
    /// caller wraps it with the record's index.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, String> {
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(format!(
                "expected exactly {OPTIONS_PER_QUESTION} options, got {}",
                options.len()
            ));
        }
        if correct_answer >= options.len() {
            return Err(format!(
                "correctAnswer index {correct_answer} is out of range for {} options",
                options.len()
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            question: question.into(),
            options,
            correct_answer,
        })
    }
}

/// An ordered set of questions, produced once per pipeline invocation.
///
/// Serialises to the `{"questions": [...]}` response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

/// One submitted answer: which option the user picked for which question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub answer: usize,
}

/// A quiz submission.
///
/// Carries the original question set alongside the answers: the server
/// never persists generated questions, so the client resubmitting them is
/// the source of truth scoring is computed against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub questions: Vec<Question>,
    pub answers: Vec<QuizAnswer>,
}

/// Per-answer correctness verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub question_id: String,
    pub is_correct: bool,
    pub correct_answer: usize,
}

/// Aggregate scoring result for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub score: usize,
    pub total_questions: usize,
    pub results: Vec<AnswerResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_options() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into(), "d".into()]
    }

    #[test]
    fn new_generates_unique_ids() {
        let a = Question::new("Q1?", four_options(), 0).unwrap();
        let b = Question::new("Q1?", four_options(), 0).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn new_rejects_wrong_option_count() {
        let err = Question::new("Q?", vec!["only".into(), "two".into()], 0).unwrap_err();
        assert!(err.contains("exactly 4"), "got: {err}");
    }

    #[test]
    fn new_rejects_out_of_range_index() {
        let err = Question::new("Q?", four_options(), 4).unwrap_err();
        assert!(err.contains("out of range"), "got: {err}");
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let q = Question::new("Q?", four_options(), 2).unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["correctAnswer"], 2);
        assert!(json.get("correct_answer").is_none());
    }

    #[test]
    fn question_set_envelope() {
        let set = QuestionSet {
            questions: vec![Question::new("Q?", four_options(), 1).unwrap()],
        };
        let json = serde_json::to_value(&set).unwrap();
        assert!(json["questions"].is_array());
    }
}
