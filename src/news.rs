//! News fetch step.
//!
//! Issues one search request per digest run against a NewsAPI-compatible
//! `/v2/everything` endpoint and unwraps the response envelope.
//!
//! The envelope is decoded whatever the HTTP status, because the service
//! reports failures (bad key, rate limit, bad date) as a JSON body with
//! `status: "error"` and a human-readable `message`.

use crate::config::NewsConfig;
use crate::error::{DigestError, Result};
use crate::models::{DateRange, NewsArticle, NewsEnvelope};
use crate::utils::truncate_for_log;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Message used when the service reports a failure without explaining it.
pub const FETCH_FAILED_FALLBACK: &str = "Failed to fetch news";

/// A source of articles for a date range.
pub trait NewsSource {
    /// Fetch the articles published within `range`, in the source's order.
    async fn fetch_articles(&self, range: &DateRange) -> Result<Vec<NewsArticle>>;
}

/// Client for a NewsAPI-compatible search endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    config: NewsConfig,
    endpoint: Url,
    http: reqwest::Client,
}

impl NewsApiClient {
    pub fn new(config: NewsConfig, http: reqwest::Client) -> Result<Self> {
        let endpoint = Url::parse(&config.base_url)?.join("v2/everything")?;
        Ok(Self {
            config,
            endpoint,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn query(&self, range: &DateRange) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("q", self.config.topic.clone()),
            ("from", range.start_param()),
            ("to", range.end_param()),
            ("sortBy", self.config.sort_by.clone()),
            ("pageSize", self.config.page_size.to_string()),
            ("language", self.config.language.clone()),
        ];
        if let Some(key) = &self.config.api_key {
            query.push(("apiKey", key.clone()));
        }
        query
    }
}

/// Turn a decoded envelope into its article list, or the service's complaint.
pub fn unwrap_envelope(envelope: NewsEnvelope) -> Result<Vec<NewsArticle>> {
    if !envelope.is_success() {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| FETCH_FAILED_FALLBACK.to_string());
        return Err(DigestError::Retrieval(message));
    }
    Ok(envelope.articles.unwrap_or_default())
}

impl NewsSource for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(from = %range.start, to = %range.end))]
    async fn fetch_articles(&self, range: &DateRange) -> Result<Vec<NewsArticle>> {
        let t0 = Instant::now();
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&self.query(range))
            .send()
            .await?;
        let http_status = response.status();
        let body = response.text().await?;
        debug!(%http_status, body = %truncate_for_log(&body, 300), "News response received");

        let envelope: NewsEnvelope = serde_json::from_str(&body)?;
        if !envelope.is_success() {
            warn!(
                %http_status,
                status = %envelope.status,
                code = ?envelope.code,
                message = ?envelope.message,
                "News source rejected the request"
            );
        }
        let total_results = envelope.total_results;
        let articles = unwrap_envelope(envelope)?;

        info!(
            count = articles.len(),
            ?total_results,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched articles"
        );
        Ok(articles)
    }
}
