//! HTTP server binary for quizgen.
//!
//! A thin shim over the library crate: parses flags and environment,
//! builds the config and the OpenAI client once, and serves the router.

use anyhow::{Context, Result};
use clap::Parser;
use quizgen::api::{cors_layer, router, AppState};
use quizgen::{OpenAiGenerator, QuizConfig, TextGenerator};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quizgen", version, about = "Quiz generator HTTP API")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000, env = "PORT")]
    port: u16,

    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// OpenAI-compatible API base URL.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = OpenAiGenerator::DEFAULT_BASE_URL)]
    base_url: String,

    /// Chat-completion model.
    #[arg(long, env = "QUIZGEN_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Default number of questions per quiz (1-20).
    #[arg(long, default_value_t = 10)]
    questions: usize,

    /// Allowed CORS origins; pass "*" to allow any. Repeatable.
    #[arg(
        long = "allow-origin",
        env = "QUIZGEN_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    allow_origins: Vec<String>,

    /// Sampling temperature (0.0-2.0).
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = QuizConfig::builder()
        .question_count(args.questions)
        .model(&args.model)
        .temperature(args.temperature)
        .build()
        .context("invalid configuration")?;

    let generator: Arc<dyn TextGenerator> = Arc::new(
        OpenAiGenerator::from_config(&config, args.api_key)
            .context("failed to build OpenAI client")?
            .with_base_url(&args.base_url),
    );

    let app = router(AppState::new(config, generator)).layer(cors_layer(&args.allow_origins));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, model = %args.model, "quizgen listening");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}
