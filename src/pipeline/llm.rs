//! Generative client: the capability interface and its OpenAI-backed
//! implementation.
//!
//! The pipeline only ever sees [`TextGenerator`] — `generate(prompt) → raw
//! text`. The concrete adapter is constructed once at process start from
//! validated configuration and injected as `Arc<dyn TextGenerator>`, so
//! tests drive the whole pipeline with a stub and no ambient state (API key
//! globals, lazily-built clients) leaks into the core.
//!
//! ## Retry Strategy
//!
//! HTTP 429 / 5xx responses from completion APIs are transient and frequent
//! under load. Exponential backoff (`retry_backoff_ms * 2^attempt`) avoids
//! hammering a recovering endpoint: with the 500 ms base and 2 retries the
//! wait sequence is 500 ms → 1 s. Auth failures and other 4xx are not
//! retried — they surface immediately as `UpstreamUnavailable`.

use crate::config::QuizConfig;
use crate::error::QuizGenError;
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Capability interface for the generative model call.
///
/// Object-safe by returning a boxed future, so the pipeline can hold an
/// `Arc<dyn TextGenerator>` and tests can implement it in three lines.
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` to the model and return its raw text output.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QuizGenError>> + Send + 'a>>;
}

/// OpenAI-compatible chat-completion adapter.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl OpenAiGenerator {
    /// Default API host; override with [`OpenAiGenerator::with_base_url`]
    /// for proxies and compatible self-hosted endpoints.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com";

    /// Construct the adapter from validated configuration plus the API key.
    pub fn from_config(config: &QuizConfig, api_key: String) -> Result<Self, QuizGenError> {
        if api_key.trim().is_empty() {
            return Err(QuizGenError::InvalidConfig(
                "API key must not be empty".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| QuizGenError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Point the adapter at a different OpenAI-compatible host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<String, QuizGenError> {
        let mut last_err: Option<QuizGenError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = self.retry_backoff_ms * 2u64.pow(attempt - 1);
                warn!(
                    attempt,
                    max = self.max_retries,
                    backoff_ms = backoff,
                    "Retrying generative API call"
                );
                sleep(Duration::from_millis(backoff)).await;
            }

            match self.chat(prompt).await {
                Ok(content) => {
                    debug!(chars = content.len(), attempt, "Received model response");
                    return Ok(content);
                }
                Err(Attempt::Transient(detail)) => {
                    warn!(attempt, %detail, "Transient upstream failure");
                    last_err = Some(QuizGenError::UpstreamUnavailable { detail });
                }
                Err(Attempt::Fatal(err)) => return Err(err),
            }
        }

        Err(last_err.unwrap_or(QuizGenError::UpstreamUnavailable {
            detail: "unknown upstream failure".into(),
        }))
    }

    /// Single chat-completion attempt.
    async fn chat(&self, prompt: &str) -> Result<String, Attempt> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": crate::prompts::SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Attempt::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = format!("HTTP {status}: {}", body.chars().take(200).collect::<String>());
            return if status.as_u16() == 429 || status.is_server_error() {
                Err(Attempt::Transient(detail))
            } else {
                Err(Attempt::Fatal(QuizGenError::UpstreamUnavailable { detail }))
            };
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Attempt::Transient(format!("response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                Attempt::Fatal(QuizGenError::UpstreamUnavailable {
                    detail: "completion contained no message content".into(),
                })
            })
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QuizGenError>> + Send + 'a>> {
        Box::pin(self.generate_with_retry(prompt))
    }
}

// The api_key stays out of Debug output so request-context logging can
// never leak it.
impl fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// One attempt's outcome: retry-worthy or final.
enum Attempt {
    Transient(String),
    Fatal(QuizGenError),
}

// ── Response body shapes (only the fields we read) ───────────────────────

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let config = QuizConfig::default();
        let result = OpenAiGenerator::from_config(&config, "  ".into());
        assert!(matches!(result, Err(QuizGenError::InvalidConfig(_))));
    }

    #[test]
    fn debug_output_omits_api_key() {
        let config = QuizConfig::default();
        let generator =
            OpenAiGenerator::from_config(&config, "sk-secret-value".into()).unwrap();
        let debug = format!("{generator:?}");
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("gpt-4o-mini"));
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let config = QuizConfig::default();
        let generator = OpenAiGenerator::from_config(&config, "sk-test".into())
            .unwrap()
            .with_base_url("http://localhost:11434/");
        assert_eq!(generator.base_url, "http://localhost:11434");
    }

    #[test]
    fn chat_response_parses_expected_shape() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"[]"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("[]"));
    }
}
