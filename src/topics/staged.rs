// Two-stage topic extraction: a primary extractor (usually generative) and
// the TF-IDF fallback.
//
// The rule is fixed: if there are no documents, return nothing without
// calling anything. Otherwise try the primary once; if it is absent or fails
// in any way, run the fallback. Neither failure reaches the caller; the
// worst case is an empty topic list.

use tracing::{info, warn};

use super::tfidf::TfIdfExtractor;
use super::traits::TopicExtractor;

/// Which stage produced a topic list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// No documents, nothing was called
    Skipped,
    Primary,
    Fallback,
}

/// The topics produced by one extraction and where they came from.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub topics: Vec<String>,
    pub source: ExtractionSource,
}

pub struct StagedExtractor {
    primary: Option<Box<dyn TopicExtractor>>,
    fallback: TfIdfExtractor,
}

impl StagedExtractor {
    /// Primary extractor with the default TF-IDF fallback.
    pub fn new(primary: Box<dyn TopicExtractor>) -> Self {
        Self {
            primary: Some(primary),
            fallback: TfIdfExtractor::default(),
        }
    }

    /// No primary stage: every extraction goes straight to TF-IDF.
    pub fn fallback_only() -> Self {
        Self {
            primary: None,
            fallback: TfIdfExtractor::default(),
        }
    }

    /// Describe the configured stages for logs and terminal output.
    pub fn describe(&self) -> String {
        match &self.primary {
            Some(primary) => format!("{} (fallback: {})", primary.name(), self.fallback.name()),
            None => self.fallback.name().to_string(),
        }
    }

    /// Extract up to `topic_count` topics from `documents`.
    pub async fn extract_topics(&self, documents: &[String], topic_count: usize) -> Vec<String> {
        self.extract_with_source(documents, topic_count).await.topics
    }

    /// Same as `extract_topics`, also reporting which stage answered.
    pub async fn extract_with_source(&self, documents: &[String], topic_count: usize) -> Extraction {
        if documents.is_empty() {
            return Extraction {
                topics: Vec::new(),
                source: ExtractionSource::Skipped,
            };
        }

        if let Some(primary) = &self.primary {
            match primary.extract(documents, topic_count).await {
                Ok(topics) => {
                    info!(extractor = primary.name(), topics = topics.len(), "Extracted topics");
                    return Extraction {
                        topics,
                        source: ExtractionSource::Primary,
                    };
                }
                Err(e) => {
                    warn!(
                        extractor = primary.name(),
                        error = %e,
                        "Topic extraction failed, falling back to TF-IDF"
                    );
                }
            }
        }

        let topics = match self.fallback.extract(documents, topic_count).await {
            Ok(topics) => topics,
            Err(e) => {
                warn!(error = %e, documents = documents.len(), "TF-IDF extraction found no topics");
                Vec::new()
            }
        };

        Extraction {
            topics,
            source: ExtractionSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedExtractor {
        topics: Vec<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TopicExtractor for FixedExtractor {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn extract(&self, _documents: &[String], topic_count: usize) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.topics.iter().take(topic_count).cloned().collect())
        }
    }

    struct BrokenExtractor;

    #[async_trait]
    impl TopicExtractor for BrokenExtractor {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn extract(&self, _documents: &[String], _topic_count: usize) -> Result<Vec<String>> {
            anyhow::bail!("timed out")
        }
    }

    fn docs() -> Vec<String> {
        vec![
            "protein folding with quantum annealing".to_string(),
            "protein folding on lattice models".to_string(),
            "robotic grasping policies".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_empty_documents_skip_primary() {
        let calls = Arc::new(AtomicUsize::new(0));
        let staged = StagedExtractor::new(Box::new(FixedExtractor {
            topics: vec!["x".to_string()],
            calls: calls.clone(),
        }));
        let extraction = staged.extract_with_source(&[], 5).await;
        assert!(extraction.topics.is_empty());
        assert_eq!(extraction.source, ExtractionSource::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_success_is_used() {
        let calls = Arc::new(AtomicUsize::new(0));
        let staged = StagedExtractor::new(Box::new(FixedExtractor {
            topics: vec!["diffusion models".to_string(), "transformers".to_string()],
            calls: calls.clone(),
        }));
        let extraction = staged.extract_with_source(&docs(), 1).await;
        assert_eq!(extraction.topics, vec!["diffusion models"]);
        assert_eq!(extraction.source, ExtractionSource::Primary);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back() {
        let staged = StagedExtractor::new(Box::new(BrokenExtractor));
        let extraction = staged.extract_with_source(&docs(), 20).await;
        assert_eq!(extraction.source, ExtractionSource::Fallback);
        assert!(extraction.topics.contains(&"protein folding".to_string()));
        assert!(!extraction.topics.contains(&"quantum annealing".to_string()));
    }

    #[tokio::test]
    async fn test_fallback_failure_yields_empty() {
        let staged = StagedExtractor::new(Box::new(BrokenExtractor));
        let topics = staged
            .extract_topics(&["only one document".to_string()], 10)
            .await;
        assert!(topics.is_empty());
    }

    #[test]
    fn test_describe() {
        assert_eq!(StagedExtractor::fallback_only().describe(), "tfidf");
        assert_eq!(
            StagedExtractor::new(Box::new(BrokenExtractor)).describe(),
            "broken (fallback: tfidf)"
        );
    }
}
