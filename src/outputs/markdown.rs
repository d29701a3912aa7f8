//! Markdown export of a digest.
//!
//! One `##` section per article, in digest order, with the AI summary as a
//! block quote under the article's metadata.

use crate::models::Digest;
use std::error::Error;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Render `digest` as a Markdown document.
pub fn digest_to_markdown(digest: &Digest) -> String {
    let mut md = String::new();
    let _ = write_markdown(&mut md, digest);
    md
}

fn write_markdown(md: &mut String, digest: &Digest) -> std::fmt::Result {
    writeln!(
        md,
        "# Technology news from {} to {}\n",
        digest.from.format("%Y-%m-%d"),
        digest.to.format("%Y-%m-%d")
    )?;
    writeln!(
        md,
        "_Generated {}_\n",
        digest.generated_at.format("%Y-%m-%d %H:%M UTC")
    )?;

    for summarized in &digest.articles {
        let article = &summarized.article;
        let title = match article.title() {
            "" => "Untitled",
            t => t,
        };
        writeln!(md, "## {title}\n")?;

        let mut meta = Vec::new();
        if let Some(name) = article.source_name() {
            meta.push(format!("**{name}**"));
        }
        if let Some(published) = article.published_display() {
            meta.push(published);
        }
        if !meta.is_empty() {
            writeln!(md, "{}\n", meta.join(" · "))?;
        }

        for line in summarized.ai_summary.lines() {
            writeln!(md, "> {line}")?;
        }
        writeln!(md)?;

        if let Some(url) = article.url.as_deref().filter(|u| !u.is_empty()) {
            writeln!(md, "[Read Full Article]({url})\n")?;
        }
    }
    Ok(())
}

/// Write the Markdown rendering to `{markdown_output_dir}/{from}_{to}.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_digest(
    digest: &Digest,
    markdown_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(markdown_output_dir).await?;
    let path = PathBuf::from(markdown_output_dir).join(format!("{}.md", digest.file_stem()));
    fs::write(&path, digest_to_markdown(digest)).await?;
    info!(path = %path.display(), "Wrote Markdown digest");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleSource, DateRange, NewsArticle, SummarizedArticle};
    use chrono::NaiveDate;

    fn digest() -> Digest {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
        );
        Digest::new(
            range,
            vec![
                SummarizedArticle {
                    article: NewsArticle {
                        title: Some("First story".to_string()),
                        url: Some("https://example.com/1".to_string()),
                        source: ArticleSource {
                            id: Some("wired".to_string()),
                            name: Some("Wired".to_string()),
                        },
                        ..Default::default()
                    },
                    ai_summary: "Line one.\nLine two.".to_string(),
                },
                SummarizedArticle {
                    article: NewsArticle::default(),
                    ai_summary: "Summary unavailable".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_markdown_sections_in_order() {
        let md = digest_to_markdown(&digest());
        assert!(md.starts_with("# Technology news from 2025-05-05 to 2025-05-06"));
        let first = md.find("## First story").unwrap();
        let second = md.find("## Untitled").unwrap();
        assert!(first < second);
        assert!(md.contains("**Wired**"));
        assert!(md.contains("> Line one.\n> Line two.\n"));
        assert!(md.contains("[Read Full Article](https://example.com/1)"));
    }

    #[tokio::test]
    async fn test_write_digest_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let path = write_digest(&digest(), dir).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "2025-05-05_2025-05-06.md");
        assert!(std::fs::read_to_string(path).unwrap().contains("## First story"));
    }
}
