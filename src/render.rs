//! Text rendering of the digest view.
//!
//! [`render`] is a pure function of the date range and request state. It
//! lays out, top to bottom: header, controls, error banner, article cards,
//! and the empty-state hint (only before the first fetch).

use crate::models::{DateRange, SummarizedArticle};
use crate::state::FetchState;
use std::fmt::{self, Write};

pub const TRIGGER_LABEL: &str = "Get News";
pub const TRIGGER_LABEL_LOADING: &str = "Loading...";
pub const EMPTY_STATE_HINT: &str = "Click \"Get News\" to fetch articles";

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Render the whole view.
pub fn render(range: &DateRange, state: &FetchState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_view(&mut out, range, state);
    out
}

fn write_view(out: &mut String, range: &DateRange, state: &FetchState) -> fmt::Result {
    writeln!(out, "AI News Digest")?;
    writeln!(out, "Powered by NewsAPI")?;
    writeln!(out, "{RULE}")?;

    let trigger = if state.is_loading() {
        format!("({TRIGGER_LABEL_LOADING}) [disabled]")
    } else {
        format!("[{TRIGGER_LABEL}]")
    };
    writeln!(
        out,
        "From: {}   To: {}   {}",
        range.start_param(),
        range.end_param(),
        trigger
    )?;
    writeln!(out, "{RULE}")?;

    if let Some(message) = state.error_message() {
        writeln!(out, "Error: {message}")?;
        writeln!(out, "{RULE}")?;
    }

    for (i, article) in state.articles().iter().enumerate() {
        write_card(out, i + 1, article)?;
        writeln!(out, "{RULE}")?;
    }

    if state.shows_empty_state() {
        writeln!(out)?;
        writeln!(out, "{EMPTY_STATE_HINT}")?;
    }
    Ok(())
}

/// One article card. `number` is what the user passes to `speak`.
fn write_card(out: &mut String, number: usize, summarized: &SummarizedArticle) -> fmt::Result {
    let article = &summarized.article;
    writeln!(out, "[{number}] {}", article.title())?;

    let mut meta = Vec::new();
    if let Some(published) = article.published_display() {
        meta.push(published);
    }
    if let Some(name) = article.source_name() {
        meta.push(format!("<{name}>"));
    }
    if !meta.is_empty() {
        writeln!(out, "    {}", meta.join("  "))?;
    }
    if let Some(image) = article.image_url() {
        writeln!(out, "    Image: {image}")?;
    }

    writeln!(out, "    AI SUMMARY   (speak {number} | stop)")?;
    for line in summarized.ai_summary.lines() {
        writeln!(out, "    {line}")?;
    }
    if let Some(url) = article.url.as_deref().filter(|u| !u.is_empty()) {
        writeln!(out, "    Read Full Article -> {url}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleSource, NewsArticle};
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
        )
    }

    fn summarized(title: &str) -> SummarizedArticle {
        SummarizedArticle {
            article: NewsArticle {
                title: Some(title.to_string()),
                url: Some(format!("https://example.com/{title}")),
                source: ArticleSource {
                    id: None,
                    name: Some("Wired".to_string()),
                },
                ..Default::default()
            },
            ai_summary: format!("About {title}."),
        }
    }

    #[test]
    fn test_idle_shows_controls_and_empty_state() {
        let view = render(&range(), &FetchState::Idle);
        assert!(view.contains("From: 2025-05-05   To: 2025-05-06   [Get News]"));
        assert!(view.contains(EMPTY_STATE_HINT));
        assert!(!view.contains("Error:"));
    }

    #[test]
    fn test_loading_disables_trigger_and_hides_empty_state() {
        let view = render(&range(), &FetchState::Loading);
        assert!(view.contains("(Loading...) [disabled]"));
        assert!(!view.contains("[Get News]"));
        assert!(!view.contains(EMPTY_STATE_HINT));
    }

    #[test]
    fn test_failure_shows_banner_only() {
        let view = render(&range(), &FetchState::Failure("rateLimited".to_string()));
        assert!(view.contains("Error: rateLimited"));
        assert!(!view.contains(EMPTY_STATE_HINT));
        assert!(!view.contains("AI SUMMARY"));
    }

    #[test]
    fn test_success_renders_cards_in_order() {
        let state = FetchState::Success(vec![summarized("alpha"), summarized("beta")]);
        let view = render(&range(), &state);

        let alpha = view.find("[1] alpha").unwrap();
        let beta = view.find("[2] beta").unwrap();
        assert!(alpha < beta);
        assert!(view.contains("About alpha."));
        assert!(view.contains("<Wired>"));
        assert!(view.contains("Read Full Article -> https://example.com/beta"));
        assert!(!view.contains(EMPTY_STATE_HINT));
    }

    #[test]
    fn test_card_skips_missing_optional_fields() {
        let bare = SummarizedArticle {
            article: NewsArticle::default(),
            ai_summary: "Summary unavailable".to_string(),
        };
        let mut card = String::new();
        write_card(&mut card, 3, &bare).unwrap();
        assert!(card.starts_with("[3] \n"));
        assert!(!card.contains("Image:"));
        assert!(!card.contains("Read Full Article"));
        assert!(card.contains("Summary unavailable"));
    }
}
