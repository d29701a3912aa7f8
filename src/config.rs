//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration apart from the two API keys, which usually arrive
//! through the CLI or the environment instead.
//!
//! ```yaml
//! news:
//!   api_key: "..."
//!   topic: technology
//!   page_size: 10
//! summarizer:
//!   api_key: "..."
//!   model: claude-sonnet-4-20250514
//! speech:
//!   backend: espeak
//!   rate: 0.9
//!   # program: festival
//!   # args: ["--tts"]
//! ```

use crate::error::{DigestError, Result};
use crate::speech::{CommandSpeechEngine, SpeechBackend, VoiceSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub news: NewsConfig,
    pub summarizer: SummarizerConfig,
    pub speech: SpeechConfig,
    /// Per-request timeout for both HTTP services.
    pub timeout_secs: u64,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            news: NewsConfig::default(),
            summarizer: SummarizerConfig::default(),
            speech: SpeechConfig::default(),
            timeout_secs: 60,
        }
    }
}

/// Settings for the news-search endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub topic: String,
    pub language: String,
    pub page_size: u32,
    pub sort_by: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org".to_string(),
            api_key: None,
            topic: "technology".to_string(),
            language: "en".to_string(),
            page_size: 10,
            sort_by: "publishedAt".to_string(),
        }
    }
}

/// Settings for the language-model endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub api_version: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key: None,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1000,
            api_version: "2023-06-01".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub backend: SpeechBackend,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Custom TTS program; when set, `backend` and the voice flags are ignored.
    pub program: Option<String>,
    pub args: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        let voice = VoiceSettings::default();
        Self {
            backend: SpeechBackend::default(),
            rate: voice.rate,
            pitch: voice.pitch,
            volume: voice.volume,
            program: None,
            args: Vec::new(),
        }
    }
}

impl SpeechConfig {
    pub fn engine(&self) -> CommandSpeechEngine {
        match &self.program {
            Some(program) => CommandSpeechEngine::with_program(program.clone(), self.args.clone()),
            None => CommandSpeechEngine::new(self.backend),
        }
    }

    pub fn voice(&self) -> VoiceSettings {
        VoiceSettings {
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}

// Keep credentials out of debug logs.
impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("topic", &self.topic)
            .field("language", &self.language)
            .field("page_size", &self.page_size)
            .field("sort_by", &self.sort_by)
            .finish()
    }
}

impl std::fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl DigestConfig {
    /// Parse a YAML document, then validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: DigestConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file at `path`.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = tokio::fs::read_to_string(path.as_ref()).await?;
        let config = Self::from_yaml(&yaml)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// The HTTP client shared by the news and summarization steps.
    ///
    /// Sets a User-Agent, which the news source requires of non-browser clients.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        Ok(client)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.news.base_url)?;
        Url::parse(&self.summarizer.base_url)?;
        if self.news.page_size == 0 {
            return Err(DigestError::Config("news.page_size must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(DigestError::Config("timeout_secs must be at least 1".to_string()));
        }
        if self.summarizer.max_tokens == 0 {
            return Err(DigestError::Config(
                "summarizer.max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = DigestConfig::from_yaml("{}").unwrap();
        assert_eq!(config.news.topic, "technology");
        assert_eq!(config.news.language, "en");
        assert_eq!(config.news.page_size, 10);
        assert_eq!(config.news.sort_by, "publishedAt");
        assert_eq!(config.summarizer.model, "claude-sonnet-4-20250514");
        assert_eq!(config.summarizer.max_tokens, 1000);
        assert_eq!(config.speech.rate, 0.9);
        assert!(config.news.api_key.is_none());
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_partial_document_overrides_only_named_fields() {
        let yaml = "news:\n  topic: rust\n  page_size: 5\nspeech:\n  backend: say\n";
        let config = DigestConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.news.topic, "rust");
        assert_eq!(config.news.page_size, 5);
        assert_eq!(config.news.language, "en");
        assert_eq!(config.speech.backend, SpeechBackend::Say);
    }

    #[test]
    fn test_custom_speech_program() {
        let yaml = "speech:\n  program: festival\n  args: [\"--tts\"]\n";
        let config = DigestConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.speech.program.as_deref(), Some("festival"));
        assert_eq!(config.speech.args, vec!["--tts"]);
        assert!(DigestConfig::default().speech.program.is_none());
    }

    #[test]
    fn test_blank_document_uses_defaults() {
        let config = DigestConfig::from_yaml("\n").unwrap();
        assert_eq!(config.news.page_size, 10);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = DigestConfig::from_yaml("news:\n  base_url: not a url\n").unwrap_err();
        assert!(matches!(err, DigestError::InvalidUrl(_)));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = DigestConfig::from_yaml("news:\n  page_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_debug_redacts_api_keys() {
        let mut config = DigestConfig::default();
        config.news.api_key = Some("secret-news".to_string());
        config.summarizer.api_key = Some("secret-llm".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-news"));
        assert!(!debug.contains("secret-llm"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "summarizer:\n  model: test-model").unwrap();
        let config = DigestConfig::load(file.path()).await.unwrap();
        assert_eq!(config.summarizer.model, "test-model");
    }
}
