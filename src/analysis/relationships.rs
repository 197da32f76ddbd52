// Topic relationships — co-occurrence graph and degree centrality for a year.
//
// Each candidate topic gets the set of paper indices whose lowercase text
// contains it. Co-occurrence of two distinct topics is the size of the
// intersection of their sets. The matrix is stored per direction (a -> b and
// b -> a), each entry kept only when it reaches `min_cooccurrence`.
// Centrality counts a topic's kept entries with a positive weight.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use super::{dedup_topics, Outcome, TopicMap};
use crate::corpus::models::{document_texts, PaperRecord};
use crate::corpus::CorpusSession;
use crate::topics::StagedExtractor;

/// Candidate topics extracted from the year's papers.
pub const CANDIDATE_TOPICS: usize = 30;

/// Minimum co-occurrence used when the caller doesn't pick one.
pub const DEFAULT_MIN_COOCCURRENCE: usize = 2;

/// Co-occurrence graph for one year's papers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicRelationships {
    pub year: i32,
    /// Candidate topics in extractor order
    pub topics: Vec<String>,
    /// Number of papers mentioning each topic
    pub topic_frequencies: TopicMap<usize>,
    /// topic -> (other topic -> shared paper count), kept entries only
    pub cooccurrence_matrix: TopicMap<TopicMap<usize>>,
    /// topic -> number of kept entries with a positive weight
    pub centrality: TopicMap<usize>,
    pub total_papers: usize,
}

impl TopicRelationships {
    /// Shared paper count for `a -> b`, if that entry was kept.
    pub fn cooccurrence(&self, a: &str, b: &str) -> Option<usize> {
        self.cooccurrence_matrix
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
    }

    /// Topics that appear in at least one paper.
    pub fn nodes(&self) -> Vec<&str> {
        self.topic_frequencies
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(topic, _)| topic)
            .collect()
    }

    /// Topics by centrality, highest first; ties keep candidate order.
    pub fn ranked_by_centrality(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.centrality.iter().map(|(t, &c)| (t, c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Build the co-occurrence graph for `papers` over the candidate `topics`.
pub fn build_relationships(
    year: i32,
    papers: &[PaperRecord],
    topics: &[String],
    min_cooccurrence: usize,
) -> TopicRelationships {
    let candidates = dedup_topics(topics);

    // topic -> indices of papers mentioning it
    let lowered: Vec<String> = papers
        .iter()
        .map(|p| p.document_text().to_lowercase())
        .collect();
    let mut paper_sets: TopicMap<BTreeSet<usize>> = TopicMap::new();
    for topic in &candidates {
        let needle = topic.to_lowercase();
        let set: BTreeSet<usize> = lowered
            .iter()
            .enumerate()
            .filter(|(_, text)| text.contains(needle.as_str()))
            .map(|(i, _)| i)
            .collect();
        paper_sets.insert(topic.clone(), set);
    }

    let mut topic_frequencies = TopicMap::new();
    let mut cooccurrence_matrix = TopicMap::new();
    let mut centrality = TopicMap::new();

    for a in &candidates {
        let papers_a = paper_sets.get(a).cloned().unwrap_or_default();
        topic_frequencies.insert(a.clone(), papers_a.len());

        let mut row = TopicMap::new();
        for b in &candidates {
            if a == b {
                continue;
            }
            let shared = paper_sets
                .get(b)
                .map(|papers_b| papers_a.intersection(papers_b).count())
                .unwrap_or(0);
            if shared >= min_cooccurrence {
                row.insert(b.clone(), shared);
            }
        }

        centrality.insert(a.clone(), row.iter().filter(|(_, w)| **w > 0).count());
        cooccurrence_matrix.insert(a.clone(), row);
    }

    TopicRelationships {
        year,
        topics: topics.to_vec(),
        topic_frequencies,
        cooccurrence_matrix,
        centrality,
        total_papers: papers.len(),
    }
}

/// Analyze topic co-occurrence among the papers of `year`.
pub async fn analyze_relationships(
    session: &CorpusSession,
    extractor: &StagedExtractor,
    year: i32,
    min_cooccurrence: usize,
) -> Outcome<TopicRelationships> {
    let papers = session.papers_for_year(year).await;
    if papers.is_empty() {
        return Outcome::no_data(format!("No papers found for year {year}"));
    }

    let texts = document_texts(&papers);
    let topics = extractor.extract_topics(&texts, CANDIDATE_TOPICS).await;
    let relationships = build_relationships(year, &papers, &topics, min_cooccurrence);

    info!(
        year,
        papers = papers.len(),
        topics = relationships.topics.len(),
        nodes = relationships.nodes().len(),
        "Topic relationship analysis complete"
    );

    Outcome::Found(relationships)
}
