//! The view/controller unit: date range, services and request state.
//!
//! State is published on a [`tokio::sync::watch`] channel, so a renderer can
//! observe `Loading` while a run is in flight and the final result replaces
//! it in one step.
//!
//! A fetch triggered while another is still running is ignored. The
//! check-and-set happens in a single `send_if_modified` call, so two
//! triggers can never both start. If an in-flight run is dropped before it
//! finishes, the state falls back to `Idle`.

use crate::models::DateRange;
use crate::news::NewsSource;
use crate::pipeline::run_digest;
use crate::state::FetchState;
use crate::summarize::Summarizer;
use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

pub struct DigestController<N, S> {
    news: N,
    summarizer: S,
    range: DateRange,
    state: watch::Sender<FetchState>,
}

/// Resets `Loading` to `Idle` unless the run completed.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<FetchState>,
    finished: bool,
}

impl LoadingGuard<'_> {
    fn finish(mut self, outcome: FetchState) {
        self.finished = true;
        self.state.send_replace(outcome);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!("Digest run dropped before completion; returning to idle");
        self.state.send_if_modified(|s| {
            if s.is_loading() {
                *s = FetchState::Idle;
                true
            } else {
                false
            }
        });
    }
}

impl<N, S> DigestController<N, S>
where
    N: NewsSource,
    S: Summarizer,
{
    pub fn new(news: N, summarizer: S, range: DateRange) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            news,
            summarizer,
            range,
            state,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn set_start(&mut self, start: NaiveDate) {
        self.range.start = start;
    }

    pub fn set_end(&mut self, end: NaiveDate) {
        self.range.end = end;
    }

    /// Snapshot of the current request state.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Summary of the article at `index` in the current results, if any.
    pub fn summary_at(&self, index: usize) -> Option<String> {
        self.state
            .borrow()
            .articles()
            .get(index)
            .map(|a| a.ai_summary.clone())
    }

    /// Run fetch-and-summarize for the current range.
    ///
    /// Returns `false` without doing anything if a run is already in flight.
    #[instrument(level = "info", skip_all, fields(from = %self.range.start, to = %self.range.end))]
    pub async fn fetch(&self) -> bool {
        let started = self.state.send_if_modified(|s| {
            if s.is_loading() {
                false
            } else {
                *s = FetchState::Loading;
                true
            }
        });
        if !started {
            warn!("Fetch already in progress; ignoring trigger");
            return false;
        }

        let guard = LoadingGuard {
            state: &self.state,
            finished: false,
        };
        let range = self.range;
        let outcome = run_digest(&self.news, &self.summarizer, &range).await;
        match &outcome {
            Ok(articles) => info!(count = articles.len(), "Digest ready"),
            Err(e) => error!(error = %e, "Digest failed"),
        }
        guard.finish(FetchState::from(outcome));
        true
    }
}
