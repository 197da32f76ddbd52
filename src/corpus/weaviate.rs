// Weaviate corpus backend — reads papers from a remote Weaviate collection.
//
// Uses the GraphQL `Get` endpoint with an exact-equality `year` filter and the
// caller's limit. Only the text fields are requested; vectors never leave the
// server. Any transport error, non-2xx status or GraphQL `errors` array turns
// into an Err here; the CorpusSession decides what that means.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::models::PaperRecord;
use super::traits::Corpus;

/// Client for a Weaviate instance holding one paper collection.
pub struct WeaviateCorpus {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    class_name: String,
}

impl WeaviateCorpus {
    /// Create a client for `class_name` at `base_url`.
    /// An empty `api_key` sends no Authorization header (anonymous access).
    pub fn new(base_url: &str, api_key: &str, class_name: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("trendline/0.1 (topic-evolution)")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            class_name: class_name.to_string(),
        })
    }
}

/// Build the GraphQL query for one year of papers.
pub fn build_year_query(class_name: &str, year: i32, limit: usize) -> String {
    format!(
        "{{ Get {{ {class_name}(where: {{path: [\"year\"], operator: Equal, valueInt: {year}}}, \
         limit: {limit}) {{ title abstract summary year venue _additional {{ id }} }} }} }}"
    )
}

#[async_trait]
impl Corpus for WeaviateCorpus {
    fn describe(&self) -> String {
        format!("Weaviate collection {} at {}", self.class_name, self.base_url)
    }

    async fn fetch_by_year(&self, year: i32, limit: usize) -> Result<Vec<PaperRecord>> {
        let url = format!("{}/v1/graphql", self.base_url);
        let body = json!({ "query": build_year_query(&self.class_name, year, limit) });

        debug!(year, limit, class = %self.class_name, "Weaviate GraphQL request");

        let mut request = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .context("Weaviate request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Weaviate returned {}: {}", status, body);
        }

        let parsed: GraphQlResponse = response
            .json()
            .await
            .context("Failed to parse Weaviate response")?;

        records_from_response(parsed, &self.class_name, year)
    }
}

/// Convert a GraphQL response into paper records.
///
/// Missing text fields become empty strings; a missing `year` falls back to
/// the year that was queried for.
pub fn records_from_response(
    response: GraphQlResponse,
    class_name: &str,
    year: i32,
) -> Result<Vec<PaperRecord>> {
    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        anyhow::bail!("Weaviate query failed: {}", messages.join("; "));
    }

    let objects = response
        .data
        .and_then(|mut data| data.get.remove(class_name))
        .flatten()
        .unwrap_or_default();

    Ok(objects
        .into_iter()
        .map(|obj| PaperRecord {
            id: obj.additional.and_then(|a| a.id).unwrap_or_default(),
            title: obj.title.unwrap_or_default(),
            abstract_text: obj.abstract_text.unwrap_or_default(),
            summary: obj.summary.unwrap_or_default(),
            year: obj.year.unwrap_or(year),
            venue: obj.venue.unwrap_or_default(),
        })
        .collect())
}

// --- GraphQL response types ---

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<GraphQlData>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlData {
    #[serde(rename = "Get", default)]
    pub get: HashMap<String, Option<Vec<PaperObject>>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PaperObject {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub summary: Option<String>,
    pub year: Option<i32>,
    pub venue: Option<String>,
    #[serde(rename = "_additional")]
    pub additional: Option<Additional>,
}

#[derive(Debug, Deserialize)]
pub struct Additional {
    pub id: Option<String>,
}
