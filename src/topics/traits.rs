// Topic extractor trait — swap-ready abstraction.
//
// Two implementations exist: the generative extractor (remote text-generation
// service) and the TF-IDF extractor (local statistics). StagedExtractor chains
// them; the rest of the crate only ever asks it for topics.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for turning a batch of document texts into a ranked topic list.
#[async_trait]
pub trait TopicExtractor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Extract at most `topic_count` topics, most relevant first.
    async fn extract(&self, documents: &[String], topic_count: usize) -> Result<Vec<String>>;
}
