//! Command-line interface definitions for News Digest.
//!
//! All credentials can be provided via command-line flags or environment
//! variables. Flags override the values from the optional config file.

use crate::config::DigestConfig;
use crate::models::DateRange;
use crate::speech::SpeechBackend;
use chrono::NaiveDate;
use clap::Parser;

/// Command-line arguments for the News Digest application.
///
/// # Examples
///
/// ```sh
/// # Yesterday-to-today digest, printed once
/// news_digest
///
/// # A specific window, exported to JSON and Markdown
/// news_digest --from 2025-05-01 --to 2025-05-06 -j ./json -m ./markdown
///
/// # Interactive shell with read-aloud
/// news_digest --interactive --speech-backend espeak-ng
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// First day of the search window (YYYY-MM-DD); defaults to yesterday
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the search window (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// News search API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Language-model API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    /// Search keyword (overrides the config file)
    #[arg(long)]
    pub topic: Option<String>,

    /// Number of articles to request (overrides the config file)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Text-to-speech program used for read-aloud
    #[arg(long, value_enum)]
    pub speech_backend: Option<SpeechBackend>,

    /// Output directory for the JSON digest (one-shot runs only)
    #[arg(short, long, conflicts_with = "interactive")]
    pub json_output_dir: Option<String>,

    /// Output directory for the Markdown digest (one-shot runs only)
    #[arg(short, long, conflicts_with = "interactive")]
    pub markdown_output_dir: Option<String>,

    /// Start an interactive shell instead of a single fetch
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// The search window, with missing ends filled from the default range.
    pub fn date_range(&self) -> DateRange {
        let default = DateRange::default();
        DateRange::new(
            self.from.unwrap_or(default.start),
            self.to.unwrap_or(default.end),
        )
    }

    /// Apply flag overrides on top of the file configuration.
    pub fn apply_to(&self, config: &mut DigestConfig) {
        if let Some(key) = &self.news_api_key {
            config.news.api_key = Some(key.clone());
        }
        if let Some(key) = &self.anthropic_api_key {
            config.summarizer.api_key = Some(key.clone());
        }
        if let Some(topic) = &self.topic {
            config.news.topic = topic.clone();
        }
        if let Some(page_size) = self.page_size {
            config.news.page_size = page_size;
        }
        if let Some(backend) = self.speech_backend {
            config.speech.backend = backend;
        }
    }
}
