//! # quizgen
//!
//! Generate multiple-choice quizzes from PDF documents using LLMs.
//!
//! ## Why this crate?
//!
//! Turning a document into a quiz is mostly plumbing — the one genuinely
//! hard part is that the generative model's output is free text with no
//! structural guarantee. This crate treats that as the core problem: a
//! defensive normalisation layer coerces whatever the model returns
//! (fenced, wrapped, mis-shaped, or an outright error payload) into a
//! strongly-typed question list, or fails with a precisely classified
//! error.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Extract    pull the text layer via pdf-extract (spawn_blocking)
//!  ├─ 2. Prompt     bounded excerpt + strict JSON-array instruction
//!  ├─ 3. Generate   chat-completion call with retry/backoff
//!  ├─ 4. Normalise  fence-strip, parse, shape-recover, validate
//!  └─ 5. Respond    typed QuestionSet, ids generated locally
//! ```
//!
//! Scoring is the mirror operation: the client resubmits the question set
//! with its answers and gets per-question verdicts plus an aggregate score.
//! Nothing is persisted between the two calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizgen::{generate_quiz, OpenAiGenerator, QuizConfig, TextGenerator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = QuizConfig::default();
//!     let api_key = std::env::var("OPENAI_API_KEY")?;
//!     let generator: Arc<dyn TextGenerator> =
//!         Arc::new(OpenAiGenerator::from_config(&config, api_key)?);
//!
//!     let bytes = std::fs::read("lecture-notes.pdf")?;
//!     let set = generate_quiz(bytes, "application/pdf", 10, &config, &generator).await?;
//!     for q in &set.questions {
//!         println!("{} ({} options)", q.question, q.options.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `quizgen` server binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! quizgen = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod config;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod prompts;
pub mod question;
pub mod scoring;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{QuizConfig, QuizConfigBuilder, MAX_QUESTION_COUNT};
pub use error::QuizGenError;
pub use generate::{generate_quiz, generate_quiz_from_text};
pub use pipeline::llm::{OpenAiGenerator, TextGenerator};
pub use question::{
    AnswerResult, Question, QuestionSet, QuizAnswer, QuizSubmission, ScoringResult,
};
pub use scoring::score_submission;
