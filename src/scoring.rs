//! Scoring: compare submitted answers against the resubmitted question set.
//!
//! The server never persists generated questions, so the submission carries
//! the original set back and scoring is a pure function over it. Question
//! ids are server-generated uuids; a duplicate id in the resubmitted set
//! means a tampered payload, and first-occurrence-wins keeps the result
//! deterministic.

use crate::error::QuizGenError;
use crate::question::{AnswerResult, QuizSubmission, ScoringResult};
use std::collections::HashMap;

/// Score a submission, one result per submitted answer.
///
/// Fails with [`QuizGenError::UnknownQuestionId`] when an answer references
/// an id not present in the submitted question set.
pub fn score_submission(submission: &QuizSubmission) -> Result<ScoringResult, QuizGenError> {
    let mut by_id = HashMap::with_capacity(submission.questions.len());
    for question in &submission.questions {
        by_id.entry(question.id.as_str()).or_insert(question);
    }

    let mut results = Vec::with_capacity(submission.answers.len());
    let mut score = 0;

    for answer in &submission.answers {
        let question = by_id.get(answer.question_id.as_str()).ok_or_else(|| {
            QuizGenError::UnknownQuestionId {
                id: answer.question_id.clone(),
            }
        })?;

        let is_correct = answer.answer == question.correct_answer;
        if is_correct {
            score += 1;
        }

        results.push(AnswerResult {
            question_id: answer.question_id.clone(),
            is_correct,
            correct_answer: question.correct_answer,
        });
    }

    Ok(ScoringResult {
        score,
        total_questions: submission.answers.len(),
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Question, QuizAnswer};

    fn question(correct: usize) -> Question {
        Question::new(
            "Q?",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
        )
        .unwrap()
    }

    #[test]
    fn correct_and_incorrect_answers_are_scored() {
        let q1 = question(2);
        let q2 = question(0);
        let submission = QuizSubmission {
            answers: vec![
                QuizAnswer {
                    question_id: q1.id.clone(),
                    answer: 2,
                },
                QuizAnswer {
                    question_id: q2.id.clone(),
                    answer: 3,
                },
            ],
            questions: vec![q1, q2],
        };

        let result = score_submission(&submission).unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.total_questions, 2);
        assert!(result.results[0].is_correct);
        assert!(!result.results[1].is_correct);
        assert_eq!(result.results[1].correct_answer, 0);
    }

    #[test]
    fn unknown_question_id_fails() {
        let q = question(1);
        let submission = QuizSubmission {
            questions: vec![q],
            answers: vec![QuizAnswer {
                question_id: "not-a-real-id".into(),
                answer: 1,
            }],
        };

        let err = score_submission(&submission).unwrap_err();
        match err {
            QuizGenError::UnknownQuestionId { id } => assert_eq!(id, "not-a-real-id"),
            other => panic!("expected UnknownQuestionId, got {other:?}"),
        }
    }

    #[test]
    fn empty_submission_scores_zero_of_zero() {
        let submission = QuizSubmission {
            questions: vec![],
            answers: vec![],
        };
        let result = score_submission(&submission).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.total_questions, 0);
        assert!(result.results.is_empty());
    }

    #[test]
    fn duplicate_question_ids_keep_first_occurrence() {
        let mut q1 = question(0);
        let mut q2 = question(3);
        q1.id = "same-id".into();
        q2.id = "same-id".into();

        let submission = QuizSubmission {
            questions: vec![q1, q2],
            answers: vec![QuizAnswer {
                question_id: "same-id".into(),
                answer: 0,
            }],
        };

        let result = score_submission(&submission).unwrap();
        assert!(result.results[0].is_correct, "first occurrence must win");
    }
}
