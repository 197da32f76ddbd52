// TF-IDF topic extraction — the deterministic fallback.
//
// Each document is tokenized into lowercase words of two or more letters,
// digits or underscores (any script, so "naïve" stays one word), NLTK English
// stop words are dropped, and both single words and adjacent two-word
// phrases become candidate terms. A term must appear in at least two
// documents to be considered at all.
//
// Weighting follows the usual smoothed scheme:
//
//   idf(t)      = ln((1 + n_docs) / (1 + df(t))) + 1
//   w(t, d)     = count(t, d) * idf(t), L2-normalized per document
//   score(t)    = sum over documents of w(t, d)
//
// Terms are ranked by score descending (ties broken alphabetically), so the
// output is fully determined by the input documents.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};
use tracing::debug;

use super::traits::TopicExtractor;

/// TF-IDF based topic extractor. Zero network calls.
pub struct TfIdfExtractor {
    /// Minimum number of documents a term must appear in
    pub min_document_frequency: usize,
    /// Vocabulary cap; keeps the most frequent terms across the corpus
    pub max_features: usize,
    stop_words: HashSet<String>,
    token_pattern: Regex,
}

impl Default for TfIdfExtractor {
    fn default() -> Self {
        Self::new(2, 1000)
    }
}

impl TfIdfExtractor {
    pub fn new(min_document_frequency: usize, max_features: usize) -> Self {
        let stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        Self {
            min_document_frequency,
            max_features,
            stop_words,
            // Runs of ASCII word characters or any non-ASCII character; the
            // non-ASCII parts are split again in `tokens`. Pattern is a literal
            token_pattern: Regex::new(r"(?:\w|[^\x00-\x7F])+").expect("valid token pattern"),
        }
    }

    /// Lowercase words of at least two characters, stop words removed.
    fn tokens<'a>(&self, lower: &'a str) -> Vec<&'a str> {
        self.token_pattern
            .find_iter(lower)
            .flat_map(|m| m.as_str().split(|c: char| !(c.is_alphanumeric() || c == '_')))
            .filter(|t| t.chars().count() >= 2)
            .filter(|t| !self.stop_words.contains(*t))
            .collect()
    }

    /// Unigram and bigram terms of one document, in order of appearance.
    fn terms(&self, document: &str) -> Vec<String> {
        let lower = document.to_lowercase();
        let tokens = self.tokens(&lower);

        let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
        terms
    }

    /// Score every eligible term across `documents`, highest first.
    ///
    /// Returns an empty vector when no term reaches the minimum document
    /// frequency (which is always the case with fewer than two documents).
    pub fn ranked_terms(&self, documents: &[String]) -> Vec<(String, f64)> {
        let doc_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for term in self.terms(doc) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        // Document frequency and total corpus frequency per term
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<&str, usize> = HashMap::new();
        for counts in &doc_counts {
            for (term, &count) in counts {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
                *corpus_frequency.entry(term.as_str()).or_insert(0) += count;
            }
        }

        let mut vocabulary: Vec<&str> = document_frequency
            .iter()
            .filter(|(_, df)| **df >= self.min_document_frequency)
            .map(|(term, _)| *term)
            .collect();

        if vocabulary.len() > self.max_features {
            vocabulary.sort_by(|a, b| corpus_frequency[b].cmp(&corpus_frequency[a]).then(a.cmp(b)));
            vocabulary.truncate(self.max_features);
        }

        let n_docs = documents.len() as f64;
        let idf: HashMap<&str, f64> = vocabulary
            .iter()
            .map(|&term| {
                let df = document_frequency[term] as f64;
                (term, ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0)
            })
            .collect();

        let mut scores: HashMap<&str, f64> = HashMap::new();
        for counts in &doc_counts {
            let weights: Vec<(&str, f64)> = counts
                .iter()
                .filter_map(|(term, &count)| {
                    idf.get(term.as_str())
                        .map(|&w| (term.as_str(), count as f64 * w))
                })
                .collect();

            let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (term, w) in weights {
                *scores.entry(term).or_insert(0.0) += w / norm;
            }
        }

        let mut ranked: Vec<(String, f64)> = scores
            .into_iter()
            .map(|(term, score)| (term.to_string(), score))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }
}

#[async_trait]
impl TopicExtractor for TfIdfExtractor {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    async fn extract(&self, documents: &[String], topic_count: usize) -> Result<Vec<String>> {
        let ranked = self.ranked_terms(documents);

        if ranked.is_empty() {
            anyhow::bail!(
                "TF-IDF found no terms in at least {} of {} documents",
                self.min_document_frequency,
                documents.len()
            );
        }

        debug!(
            terms = ranked.len(),
            top_term = &ranked[0].0,
            top_score = ranked[0].1,
            "Ranked TF-IDF terms"
        );

        Ok(ranked
            .into_iter()
            .take(topic_count)
            .map(|(term, _)| term)
            .collect())
    }
}
