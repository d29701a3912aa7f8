//! The fetch-and-summarize operation.
//!
//! One run performs a single news search and then summarizes every returned
//! article strictly one after another: the next summarization request is
//! only issued once the previous one has resolved, so total latency grows
//! linearly with the article count.
//!
//! Failure handling has two tiers:
//! - the news fetch failing (transport, decoding, non-`ok` status) aborts the
//!   run with no partial results;
//! - a summarization failure only affects its own article, which gets its
//!   description (or a fixed fallback) as summary, and the run continues.

use crate::error::{DigestError, Result};
use crate::models::{DateRange, NewsArticle, SummarizedArticle};
use crate::news::NewsSource;
use crate::summarize::Summarizer;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Used when the service answers (even with an error document) but gives no
/// text, and the article has no description.
pub const NO_SUMMARY_AVAILABLE: &str = "No summary available";
/// Used when the summarization call fails without a readable reply and the
/// article has no description.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable";

/// Summary to attach when summarization of `article` failed with `err`.
pub fn fallback_summary(article: &NewsArticle, err: &DigestError) -> String {
    let fixed = match err {
        DigestError::MissingSummary | DigestError::Rejected { .. } => NO_SUMMARY_AVAILABLE,
        _ => SUMMARY_UNAVAILABLE,
    };
    article.description().unwrap_or(fixed).to_string()
}

/// Summarize one article, substituting the fallback on failure.
///
/// Returns the augmented article and whether the fallback was used.
async fn summarize_one<S: Summarizer>(
    summarizer: &S,
    index: usize,
    article: NewsArticle,
) -> (SummarizedArticle, bool) {
    match summarizer.summarize(&article).await {
        Ok(ai_summary) => (SummarizedArticle { article, ai_summary }, false),
        Err(e) => {
            match &e {
                DigestError::MissingSummary => {
                    warn!(index, title = %article.title(), "Summary response had no text; using fallback")
                }
                _ => error!(index, title = %article.title(), error = %e, "Summary error; using fallback"),
            }
            let ai_summary = fallback_summary(&article, &e);
            (SummarizedArticle { article, ai_summary }, true)
        }
    }
}

/// Fetch the articles for `range` and attach a summary to each one.
///
/// Returns [`DigestError::NoArticles`] when the search succeeds but is empty.
#[instrument(level = "info", skip_all, fields(from = %range.start, to = %range.end))]
pub async fn run_digest<N, S>(
    news: &N,
    summarizer: &S,
    range: &DateRange,
) -> Result<Vec<SummarizedArticle>>
where
    N: NewsSource,
    S: Summarizer,
{
    let t0 = Instant::now();
    let articles = news.fetch_articles(range).await?;
    if articles.is_empty() {
        info!("News source returned no articles");
        return Err(DigestError::NoArticles);
    }

    let total = articles.len();
    info!(total, "Summarizing articles sequentially");

    let results: Vec<(SummarizedArticle, bool)> = stream::iter(articles.into_iter().enumerate())
        .then(|(index, article)| summarize_one(summarizer, index, article))
        .collect()
        .await;

    let fallbacks = results.iter().filter(|(_, fell_back)| *fell_back).count();
    info!(
        total,
        summarized = total - fallbacks,
        fallbacks,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Digest complete"
    );
    Ok(results.into_iter().map(|(article, _)| article).collect())
}
