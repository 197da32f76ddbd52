use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::corpus::session::DEFAULT_FETCH_LIMIT;
use crate::topics::generative::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Which extractor answers topic requests first.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractorBackend {
    /// Remote text-generation model (default), TF-IDF on failure
    Generative,
    /// TF-IDF only, no network calls
    TfIdf,
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    /// SQLite paper store path
    pub db_path: String,
    /// Weaviate base URL (when set, papers are read from Weaviate instead of SQLite)
    pub weaviate_url: Option<String>,
    pub weaviate_api_key: String,
    pub weaviate_class: String,
    /// Maximum papers fetched per year
    pub fetch_limit: usize,
    pub ollama_api_url: String,
    pub ollama_model: String,
    pub extractor_backend: ExtractorBackend,
    pub llm_timeout: Duration,
    pub corpus_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default; only malformed numbers are errors.
    pub fn load() -> Result<Self> {
        let extractor_backend = match env::var("TRENDLINE_EXTRACTOR").as_deref() {
            Ok("tfidf") => ExtractorBackend::TfIdf,
            // "generative" or unset both default to the remote model
            _ => ExtractorBackend::Generative,
        };

        Ok(Self {
            db_path: env::var("TRENDLINE_DB_PATH").unwrap_or_else(|_| "./trendline.db".to_string()),
            weaviate_url: env::var("WEAVIATE_URL").ok().filter(|url| !url.is_empty()),
            weaviate_api_key: env::var("WEAVIATE_API_KEY").unwrap_or_default(),
            weaviate_class: env::var("WEAVIATE_CLASS").unwrap_or_else(|_| "Papers".to_string()),
            fetch_limit: parse_var("TRENDLINE_FETCH_LIMIT", DEFAULT_FETCH_LIMIT)?,
            ollama_api_url: env::var("OLLAMA_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            extractor_backend,
            llm_timeout: Duration::from_secs(parse_var("TRENDLINE_LLM_TIMEOUT_SECS", 60)?),
            corpus_timeout: Duration::from_secs(parse_var("TRENDLINE_CORPUS_TIMEOUT_SECS", 30)?),
        })
    }

    /// Check that the local SQLite store is the active corpus.
    /// Call this before commands that write papers (`init`, `import`).
    pub fn require_local_store(&self) -> Result<()> {
        if let Some(url) = &self.weaviate_url {
            anyhow::bail!(
                "WEAVIATE_URL is set ({url}), so papers are read from Weaviate.\n\
                 Unset it to initialize or import into the local store at {}.",
                self.db_path
            );
        }
        Ok(())
    }

    /// Check that the per-year fetch limit can return anything.
    pub fn require_fetch_limit(&self) -> Result<()> {
        if self.fetch_limit == 0 {
            anyhow::bail!("TRENDLINE_FETCH_LIMIT must be at least 1");
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
