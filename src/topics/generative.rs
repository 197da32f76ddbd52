// Generative topic extraction via an Ollama-compatible generation endpoint.
//
// All documents are joined into one blob, cut to a fixed character budget,
// and sent as a single non-streaming prompt asking for the top-N topics one
// per line. Any transport error, timeout, non-2xx status, body without a
// `response` string, or empty topic list is returned as an Err so the
// StagedExtractor can fall back.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::TopicExtractor;

/// Default generation endpoint (local Ollama).
pub const DEFAULT_API_URL: &str = "http://localhost:11434/api/generate";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "qwen2.5:32b";

/// Maximum number of characters of document text included in a prompt.
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Topic extractor backed by a remote text-generation service.
pub struct GenerativeExtractor {
    client: Client,
    api_url: String,
    model: String,
}

impl GenerativeExtractor {
    pub fn new(api_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("trendline/0.1 (topic-evolution)")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            model: model.to_string(),
        })
    }
}

/// Build the extraction prompt for `documents`.
///
/// Only the first `MAX_PROMPT_CHARS` characters of the joined text are sent.
pub fn build_prompt(documents: &[String], topic_count: usize) -> String {
    let combined = documents.join(" ");
    let excerpt: String = combined.chars().take(MAX_PROMPT_CHARS).collect();

    format!(
        "Extract the top {topic_count} most important research topics from the following academic texts.\n\
         \n\
         Focus on:\n\
         - Technical methods and approaches\n\
         - Research domains and fields\n\
         - Emerging technologies\n\
         - Application areas\n\
         \n\
         Return only the topic names, one per line, without numbering or explanations.\n\
         \n\
         Texts: {excerpt}...\n\
         \n\
         Topics:"
    )
}

/// Split a generation response into topics.
///
/// Blank lines are dropped, leading `- ` / `* ` bullets are stripped, and the
/// result is cut to `topic_count` entries.
pub fn parse_topics(response: &str, topic_count: usize) -> Vec<String> {
    response
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .unwrap_or(line)
                .trim()
        })
        .filter(|topic| !topic.is_empty())
        .take(topic_count)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl TopicExtractor for GenerativeExtractor {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn extract(&self, documents: &[String], topic_count: usize) -> Result<Vec<String>> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(documents, topic_count),
            stream: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .context("Failed to call generation service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Generation service returned {}: {}", status, body);
        }

        let result: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse generation service response")?;

        let topics = parse_topics(&result.response, topic_count);
        if topics.is_empty() {
            anyhow::bail!("Generation service returned no topics");
        }

        debug!(model = %self.model, topics = topics.len(), "Extracted topics");
        Ok(topics)
    }
}

// --- Generation API request/response types ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}
