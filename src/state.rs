//! Request state for the digest view.
//!
//! A single tagged union replaces separate loading / error / results flags,
//! so an error message and a result list can never be shown together.

use crate::error::Result;
use crate::models::SummarizedArticle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A fetch-and-summarize run is in flight.
    Loading,
    /// The last run finished with at least one article.
    Success(Vec<SummarizedArticle>),
    /// The last run failed, or found no articles.
    Failure(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// The result collection; empty unless the last run succeeded.
    pub fn articles(&self) -> &[SummarizedArticle] {
        match self {
            FetchState::Success(articles) => articles,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// The "nothing fetched yet" placeholder is only shown before any run.
    pub fn shows_empty_state(&self) -> bool {
        matches!(self, FetchState::Idle)
    }
}

impl From<Result<Vec<SummarizedArticle>>> for FetchState {
    fn from(outcome: Result<Vec<SummarizedArticle>>) -> Self {
        match outcome {
            Ok(articles) => FetchState::Success(articles),
            Err(e) => FetchState::Failure(e.to_string()),
        }
    }
}
