//! Configuration types for quiz generation.
//!
//! All pipeline behaviour is controlled through [`QuizConfig`], built via its
//! [`QuizConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share the config across handlers, serialise it for logging, and diff
//! two deployments to understand why their outputs differ.
//!
//! The generative client is deliberately *not* part of this struct: it is
//! constructed once at process start from the validated config plus the API
//! key, and injected into the pipeline as an `Arc<dyn TextGenerator>` so
//! tests can swap in a stub without touching configuration.

use crate::error::QuizGenError;
use serde::{Deserialize, Serialize};

/// Hard upper bound on the number of questions a single request may ask for.
pub const MAX_QUESTION_COUNT: usize = 20;

/// Configuration for quiz generation.
///
/// Built via [`QuizConfig::builder()`] or using [`QuizConfig::default()`].
///
/// # Example
/// ```rust
/// use quizgen::QuizConfig;
///
/// let config = QuizConfig::builder()
///     .question_count(5)
///     .model("gpt-4o-mini")
///     .temperature(0.7)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Number of questions to request when the caller does not specify one.
    /// Range: 1–20. Default: 10.
    pub question_count: usize,

    /// Maximum accepted upload size in bytes. Default: 10 MiB.
    ///
    /// Checked before the PDF parser ever sees the bytes; parsing a
    /// multi-hundred-megabyte upload would pin a blocking-pool thread for
    /// seconds and the text past the excerpt cap is discarded anyway.
    pub max_upload_bytes: usize,

    /// Minimum trimmed length of extracted text, in characters. Default: 100.
    ///
    /// Below this there is too little signal to generate meaningful
    /// questions; the model pads with generic trivia instead.
    pub min_content_chars: usize,

    /// Maximum excerpt length sent to the model, in characters. Default: 3000.
    ///
    /// Prefix truncation, lossy and deterministic. 3000 characters is about
    /// 750 tokens, which keeps prompt cost flat regardless of document size
    /// while covering an abstract-plus-introduction's worth of content.
    pub max_excerpt_chars: usize,

    /// Chat-completion model identifier. Default: "gpt-4o-mini".
    pub model: String,

    /// Sampling temperature for the completion. Default: 0.7.
    ///
    /// High enough that repeated uploads of the same document produce varied
    /// question sets, low enough that the model still follows the JSON
    /// format instruction reliably.
    pub temperature: f32,

    /// Maximum tokens the model may generate per request. Default: 2000.
    ///
    /// A 10-question set with four options each runs 1200–1600 output
    /// tokens. Setting this too low truncates the JSON array mid-record,
    /// which surfaces as a `MalformedResponse` downstream.
    pub max_tokens: usize,

    /// Maximum retry attempts on a transient upstream failure. Default: 2.
    ///
    /// Only transport errors, 429 and 5xx are retried; auth failures and
    /// other 4xx surface immediately.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (doubles per attempt). Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-upstream-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: 10,
            max_upload_bytes: 10 * 1024 * 1024,
            min_content_chars: 100,
            max_excerpt_chars: 3000,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            max_retries: 2,
            retry_backoff_ms: 500,
            api_timeout_secs: 60,
        }
    }
}

impl QuizConfig {
    /// Create a new builder for `QuizConfig`.
    pub fn builder() -> QuizConfigBuilder {
        QuizConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`QuizConfig`].
#[derive(Debug)]
pub struct QuizConfigBuilder {
    config: QuizConfig,
}

impl QuizConfigBuilder {
    pub fn question_count(mut self, n: usize) -> Self {
        self.config.question_count = n.clamp(1, MAX_QUESTION_COUNT);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes.max(1024);
        self
    }

    pub fn min_content_chars(mut self, n: usize) -> Self {
        self.config.min_content_chars = n.max(1);
        self
    }

    pub fn max_excerpt_chars(mut self, n: usize) -> Self {
        self.config.max_excerpt_chars = n.max(100);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating cross-field constraints.
    pub fn build(self) -> Result<QuizConfig, QuizGenError> {
        let c = &self.config;
        if c.question_count == 0 || c.question_count > MAX_QUESTION_COUNT {
            return Err(QuizGenError::InvalidConfig(format!(
                "question_count must be 1–{MAX_QUESTION_COUNT}, got {}",
                c.question_count
            )));
        }
        if c.model.trim().is_empty() {
            return Err(QuizGenError::InvalidConfig("model must not be empty".into()));
        }
        if c.max_excerpt_chars < c.min_content_chars {
            return Err(QuizGenError::InvalidConfig(format!(
                "max_excerpt_chars ({}) must not be below min_content_chars ({})",
                c.max_excerpt_chars, c.min_content_chars
            )));
        }
        Ok(self.config)
    }
}
