//! Data models for the news feed and the summarized digest.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`DateRange`]: The user-selected window passed to the news source
//! - [`NewsEnvelope`] / [`NewsArticle`]: The news source's JSON response
//! - [`SummarizedArticle`]: An article with its AI-generated summary attached
//! - [`Digest`]: A finished run, as written by the export step
//!
//! The news source speaks camelCase JSON, hence the `rename_all` attributes.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Body text used in the summarization prompt when an article has neither
/// a description nor content.
pub const NO_CONTENT: &str = "No content";

/// The calendar window to search, inclusive on both ends.
///
/// Both dates are freely editable and no ordering between them is enforced;
/// a start date after the end date is sent to the news source as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A one-day window: `end` is `day`, `start` is the day before.
    pub fn ending_on(day: NaiveDate) -> Self {
        Self {
            start: day.pred_opt().unwrap_or(day),
            end: day,
        }
    }

    /// `YYYY-MM-DD`, the format the news source expects.
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::ending_on(Utc::now().date_naive())
    }
}

/// The publisher block attached to each article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A single article as returned by the news source.
///
/// Every field is optional: the news source emits `null` freely, notably for
/// removed articles and for paywalled content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewsArticle {
    pub fn title(&self) -> &str {
        non_empty(&self.title).unwrap_or("")
    }

    /// The article's description, if it has a non-empty one.
    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    /// Best available body text: description, then content, then [`NO_CONTENT`].
    pub fn best_body(&self) -> &str {
        self.description()
            .or_else(|| non_empty(&self.content))
            .unwrap_or(NO_CONTENT)
    }

    pub fn source_name(&self) -> Option<&str> {
        non_empty(&self.source.name)
    }

    pub fn image_url(&self) -> Option<&str> {
        non_empty(&self.url_to_image)
    }

    /// Publish timestamp converted to local time for display.
    ///
    /// Falls back to the raw string when the source sends something that is
    /// not RFC 3339.
    pub fn published_display(&self) -> Option<String> {
        let raw = non_empty(&self.published_at)?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(
                ts.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
            Err(_) => Some(raw.to_string()),
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// The news source's response envelope.
///
/// `status` is `"ok"` on success; on failure the source sets it to
/// `"error"` and explains itself in `code` and `message`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Option<Vec<NewsArticle>>,
}

impl NewsEnvelope {
    pub const SUCCESS: &'static str = "ok";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

/// An article with its AI-generated (or fallback) summary attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizedArticle {
    #[serde(flatten)]
    pub article: NewsArticle,
    #[serde(rename = "aiSummary")]
    pub ai_summary: String,
}

/// A finished digest as written to disk.
#[derive(Debug, Serialize, Deserialize)]
pub struct Digest {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub articles: Vec<SummarizedArticle>,
}

impl Digest {
    pub fn new(range: DateRange, articles: Vec<SummarizedArticle>) -> Self {
        Self {
            from: range.start,
            to: range.end,
            generated_at: Utc::now(),
            articles,
        }
    }

    /// File stem shared by the JSON and Markdown exports, e.g. `2025-05-05_2025-05-06`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.from.format("%Y-%m-%d"), self.to.format("%Y-%m-%d"))
    }
}
