//! In-memory doubles for the news, summarization and speech services.

use crate::error::{DigestError, Result};
use crate::models::{DateRange, NewsArticle};
use crate::news::NewsSource;
use crate::speech::{SpeechEngine, Utterance};
use crate::summarize::Summarizer;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn article(title: &str, description: Option<&str>) -> NewsArticle {
    NewsArticle {
        title: Some(title.to_string()),
        description: description.map(str::to_string),
        url: Some(format!("https://example.com/{title}")),
        ..Default::default()
    }
}

/// A news source with a canned answer.
#[derive(Default)]
pub struct FakeNews {
    articles: Vec<NewsArticle>,
    failure: Option<String>,
    delay: Option<Duration>,
    requested: Mutex<Vec<DateRange>>,
}

impl FakeNews {
    pub fn ok(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles,
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Some(Duration::from_millis(ms));
        self
    }

    pub fn requested(&self) -> Vec<DateRange> {
        self.requested.lock().unwrap().clone()
    }
}

impl NewsSource for FakeNews {
    async fn fetch_articles(&self, range: &DateRange) -> Result<Vec<NewsArticle>> {
        self.requested.lock().unwrap().push(*range);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(DigestError::Retrieval(message.clone())),
            None => Ok(self.articles.clone()),
        }
    }
}

/// Summarizes to `"summary of {title}"` unless told otherwise per title.
#[derive(Default)]
pub struct FakeSummarizer {
    failing: HashSet<String>,
    empty: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSummarizer {
    pub fn failing(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    pub fn empty(mut self, title: &str) -> Self {
        self.empty.insert(title.to_string());
        self
    }

    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay = Some(Duration::from_millis(ms));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Summarizer for FakeSummarizer {
    async fn summarize(&self, article: &NewsArticle) -> Result<String> {
        let title = article.title().to_string();
        self.calls.lock().unwrap().push(title.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&title) {
            return Err(DigestError::Summarizer("503: overloaded".to_string()));
        }
        if self.empty.contains(&title) {
            return Err(DigestError::MissingSummary);
        }
        Ok(format!("summary of {title}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Speak(String),
    Cancel,
}

/// Records speech calls and tracks what would currently be playing.
#[derive(Default)]
pub struct RecordingSpeech {
    events: Mutex<Vec<SpeechEvent>>,
    playing: Mutex<Option<String>>,
}

impl RecordingSpeech {
    pub fn events(&self) -> Vec<SpeechEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn playing(&self) -> Option<String> {
        self.playing.lock().unwrap().clone()
    }
}

impl SpeechEngine for RecordingSpeech {
    fn speak(&self, utterance: &Utterance) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(SpeechEvent::Speak(utterance.text.clone()));
        *self.playing.lock().unwrap() = Some(utterance.text.clone());
        Ok(())
    }

    fn cancel_all(&self) {
        self.events.lock().unwrap().push(SpeechEvent::Cancel);
        *self.playing.lock().unwrap() = None;
    }
}
