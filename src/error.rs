//! Error type shared by the news, summarization and speech steps.
//!
//! Errors fall into two tiers. Anything raised by the news fetch aborts the
//! whole digest and is shown to the user as a single message. Anything
//! raised while summarizing one article is logged and replaced by a
//! fallback summary, so it never reaches the user directly.

use thiserror::Error;

/// Message shown when the news source answers successfully with no articles.
pub const NO_ARTICLES_MESSAGE: &str = "No articles found for this date range.";

#[derive(Error, Debug)]
pub enum DigestError {
    /// The news source answered with a non-`ok` status.
    #[error("{0}")]
    Retrieval(String),

    #[error("{}", NO_ARTICLES_MESSAGE)]
    NoArticles,

    /// The summarization call failed without a readable reply.
    #[error("Summarization failed: {0}")]
    Summarizer(String),

    /// The summarization service answered with a JSON error document.
    #[error("Summarization rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The summarization service answered without any generated text.
    #[error("Summarization response contained no text")]
    MissingSummary,

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, DigestError>;
