//! Summarization step backed by a Messages-style language-model API.
//!
//! The module uses a trait-based design so the pipeline can run against the
//! real service or a test double:
//! - [`Summarizer`]: Core trait turning one article into a short summary
//! - [`AnthropicSummarizer`]: HTTP implementation for the Messages API
//!
//! Each call sends a single user-role message built from
//! [`summary_prompt`] and reads the generated text out of the first block of
//! the response's `content` array.

use crate::config::SummarizerConfig;
use crate::error::{DigestError, Result};
use crate::models::NewsArticle;
use crate::utils::truncate_for_log;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// Turns one article into a short natural-language summary.
pub trait Summarizer {
    async fn summarize(&self, article: &NewsArticle) -> Result<String>;
}

/// The fixed instruction sent for every article.
pub fn summary_prompt(article: &NewsArticle) -> String {
    format!(
        "Summarize this news article in 2-3 sentences:\n\nTitle: {}\n\nContent: {}",
        article.title(),
        article.best_body()
    )
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Extract the generated text from a Messages API response body.
fn extract_summary(body: &str) -> Result<String> {
    let response: MessagesResponse = serde_json::from_str(body)?;
    response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(DigestError::MissingSummary)
}

/// Classify a non-2xx reply.
///
/// A JSON body is a real answer that simply carries no text, so it becomes
/// [`DigestError::Rejected`] and shares the "no summary" fallback with an
/// empty reply. Anything else is an unreadable failure.
fn rejection(status: reqwest::StatusCode, body: &str, elapsed_ms: u64) -> DigestError {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(document) => {
            let message = serde_json::from_value::<ErrorResponse>(document)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| truncate_for_log(body, 200));
            warn!(%status, elapsed_ms, %message, "Summarization request rejected");
            DigestError::Rejected {
                status: status.as_u16(),
                message,
            }
        }
        Err(_) => {
            warn!(%status, elapsed_ms, "Summarization request failed without a JSON reply");
            DigestError::Summarizer(format!("{status}: {}", truncate_for_log(body, 200)))
        }
    }
}

/// HTTP client for the `/v1/messages` endpoint.
#[derive(Clone)]
pub struct AnthropicSummarizer {
    config: SummarizerConfig,
    endpoint: Url,
    http: reqwest::Client,
}

impl fmt::Debug for AnthropicSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicSummarizer")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.config.model)
            .field("max_tokens", &self.config.max_tokens)
            .finish()
    }
}

impl AnthropicSummarizer {
    pub fn new(config: SummarizerConfig, http: reqwest::Client) -> Result<Self> {
        let endpoint = Url::parse(&config.base_url)?.join("v1/messages")?;
        Ok(Self {
            config,
            endpoint,
            http,
        })
    }

    fn request_body(&self, article: &NewsArticle) -> MessagesRequest<'_> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: summary_prompt(article),
            }],
        }
    }
}

impl Summarizer for AnthropicSummarizer {
    #[instrument(level = "info", skip_all, fields(title = %truncate_for_log(article.title(), 80)))]
    async fn summarize(&self, article: &NewsArticle) -> Result<String> {
        let t0 = Instant::now();
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header("anthropic-version", &self.config.api_version)
            .json(&self.request_body(article));
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(rejection(status, &body, elapsed_ms));
        }

        let summary = extract_summary(&body)?;
        debug!(elapsed_ms, chars = summary.chars().count(), "Summary received");
        Ok(summary)
    }
}
