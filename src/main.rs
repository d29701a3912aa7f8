//! # News Digest
//!
//! Fetches recent technology articles for a date range, summarizes each one
//! with a language model, and prints the digest. In interactive mode the
//! summaries can be read aloud.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... ANTHROPIC_API_KEY=... news_digest --from 2025-05-05 --to 2025-05-06
//! news_digest --interactive
//! ```

use clap::Parser;
use news_digest::cli::Cli;
use news_digest::config::DigestConfig;
use news_digest::models::Digest;
use news_digest::news::NewsApiClient;
use news_digest::outputs::{json, markdown};
use news_digest::render::render;
use news_digest::shell::run_shell;
use news_digest::speech::Narrator;
use news_digest::summarize::AnthropicSummarizer;
use news_digest::utils::ensure_writable_dir;
use news_digest::{DigestController, FetchState};
use std::error::Error;
use std::io::Write;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, so stdout carries only the digest) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    let args = Cli::parse();
    debug!(?args.from, ?args.to, interactive = args.interactive, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => DigestConfig::load(path).await?,
        None => DigestConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;
    debug!(?config, "Effective configuration");

    if config.news.api_key.is_none() {
        warn!("No news API key configured (--news-api-key or NEWS_API_KEY)");
    }
    if config.summarizer.api_key.is_none() {
        warn!("No language-model API key configured (--anthropic-api-key or ANTHROPIC_API_KEY)");
    }

    // Early check: export directories must be writable before any network call
    for dir in [&args.json_output_dir, &args.markdown_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable");
            return Err(e);
        }
    }

    // ---- Services ----
    let http = config.http_client()?;
    let news = NewsApiClient::new(config.news.clone(), http.clone())?;
    let summarizer = AnthropicSummarizer::new(config.summarizer.clone(), http)?;
    info!(endpoint = %news.endpoint(), ?summarizer, "Services ready");

    let range = args.date_range();
    let mut controller = DigestController::new(news, summarizer, range);

    if args.interactive {
        let narrator = Narrator::new(config.speech.engine(), config.speech.voice());
        let input = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        run_shell(&mut controller, &narrator, input, &mut stdout).await?;
        info!(elapsed = ?start_time.elapsed(), "Execution complete");
        return Ok(());
    }

    // ---- One-shot run ----
    controller.fetch().await;
    let state = controller.state();
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", render(&range, &state))?;
    stdout.flush()?;

    let outcome = match state {
        FetchState::Success(articles) => {
            let digest = Digest::new(range, articles);
            if let Some(dir) = &args.json_output_dir {
                if let Err(e) = json::write_digest(&digest, dir).await {
                    error!(error = %e, "Failed to write JSON digest");
                }
            }
            if let Some(dir) = &args.markdown_output_dir {
                if let Err(e) = markdown::write_digest(&digest, dir).await {
                    error!(error = %e, "Failed to write Markdown digest");
                }
            }
            Ok(())
        }
        FetchState::Failure(message) => Err(message.into()),
        FetchState::Idle | FetchState::Loading => Ok(()),
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    outcome
}
