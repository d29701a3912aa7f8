//! # News Digest
//!
//! Fetches technology news for a date range, asks a language model for a
//! short summary of each article, and reads the summaries aloud.
//!
//! ## Architecture
//!
//! 1. **Fetching**: One search request to the news source ([`news`])
//! 2. **Summarizing**: One request per article to the language model, strictly
//!    in sequence ([`summarize`], [`pipeline`])
//! 3. **Presenting**: The request state ([`state`]) is owned by the
//!    [`controller`] and rendered as text ([`render`]), either once or from the
//!    interactive [`shell`]
//! 4. **Speaking**: Summaries are read aloud through a local TTS program
//!    ([`speech`])
//! 5. **Export**: Finished digests can be written as JSON and Markdown
//!    ([`outputs`])

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod news;
pub mod outputs;
pub mod pipeline;
pub mod render;
pub mod shell;
pub mod speech;
pub mod state;
pub mod summarize;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::DigestController;
pub use error::{DigestError, Result};
pub use models::{DateRange, NewsArticle, SummarizedArticle};
pub use state::FetchState;
