//! Quiz generation entry points: the pipeline orchestrator.
//!
//! Sequences the stages synchronously — any component failure
//! short-circuits the pipeline and surfaces as a classified
//! [`QuizGenError`]; no partial results are ever returned. All state is
//! local to one invocation's call stack, so concurrent invocations need no
//! coordination.

use crate::config::QuizConfig;
use crate::error::QuizGenError;
use crate::pipeline::{extract, llm::TextGenerator, normalize};
use crate::prompts;
use crate::question::QuestionSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Generate a quiz from uploaded document bytes.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `bytes` — Raw upload content
/// * `content_type` — The declared mime type of the upload
/// * `question_count` — How many questions to request from the model
/// * `config` — Pipeline configuration
/// * `generator` — The injected generative client (or a stub in tests)
///
/// # Errors
/// Any classified [`QuizGenError`]; see the crate-level taxonomy.
pub async fn generate_quiz(
    bytes: Vec<u8>,
    content_type: &str,
    question_count: usize,
    config: &QuizConfig,
    generator: &Arc<dyn TextGenerator>,
) -> Result<QuestionSet, QuizGenError> {
    // ── Step 1: Extract text ─────────────────────────────────────────────
    let text = extract::extract_text(bytes, content_type, config).await?;

    generate_quiz_from_text(&text, question_count, config, generator).await
}

/// Generate a quiz from already-extracted text.
///
/// Split out from [`generate_quiz`] so callers that hold plain text (and
/// the integration tests) can exercise the prompt → generate → normalize
/// path without crafting a PDF.
pub async fn generate_quiz_from_text(
    text: &str,
    question_count: usize,
    config: &QuizConfig,
    generator: &Arc<dyn TextGenerator>,
) -> Result<QuestionSet, QuizGenError> {
    let start = Instant::now();

    // ── Step 2: Build the bounded prompt ─────────────────────────────────
    let prompt = prompts::build_prompt(text, question_count, config)?;
    debug!(prompt_chars = prompt.len(), question_count, "Built prompt");

    // ── Step 3: Call the generative model ────────────────────────────────
    let raw = generator.generate(&prompt).await?;

    // ── Step 4: Normalise the untrusted output ───────────────────────────
    let questions = normalize::normalize_response(&raw)?;

    info!(
        questions = questions.len(),
        requested = question_count,
        duration_ms = start.elapsed().as_millis() as u64,
        "Quiz generated"
    );

    Ok(QuestionSet { questions })
}
