// Emerging-topic detection — which topics grew between two periods.
//
// Papers from the recent years form one pool and papers from the comparison
// years another. Candidate topics are extracted from each pool separately.
// Growth is evaluated only for the recent pool's candidates: a topic's rate
// in a pool is its summed occurrences across that pool's papers divided by
// the pool size, and the comparison rate is only counted when the topic is
// also one of the comparison pool's candidates. Topics that only the
// comparison pool proposes are never scored.

use serde::Serialize;
use tracing::info;

use super::{count_occurrences, dedup_topics, TopicMap};
use crate::corpus::models::document_texts;
use crate::corpus::CorpusSession;
use crate::topics::StagedExtractor;

/// Candidate topics extracted from each pool.
pub const CANDIDATE_TOPICS: usize = 20;

/// Growth threshold used when the caller doesn't pick one.
pub const DEFAULT_GROWTH_THRESHOLD: f64 = 0.1;

/// Growth metrics for one topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergingTopic {
    /// Occurrences per paper in the recent pool
    pub recent_frequency: f64,
    /// Occurrences per paper in the comparison pool (0 if not a comparison candidate)
    pub comparison_frequency: f64,
    pub growth_rate: f64,
    /// True exactly when `comparison_frequency` is zero
    pub is_new: bool,
}

/// Emerging topics plus the pool sizes they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergingTopics {
    /// Topics at or above the threshold, highest growth first
    pub emerging_topics: TopicMap<EmergingTopic>,
    pub recent_years: Vec<i32>,
    pub comparison_years: Vec<i32>,
    pub total_recent_papers: usize,
    pub total_comparison_papers: usize,
}

/// Relative change from `comparison_rate` to `recent_rate`.
///
/// A topic with no comparison presence scores its absolute recent rate.
pub fn growth_rate(recent_rate: f64, comparison_rate: f64) -> f64 {
    if comparison_rate > 0.0 {
        (recent_rate - comparison_rate) / comparison_rate
    } else {
        recent_rate
    }
}

/// Summed occurrences of each topic across `texts`, ignoring case.
pub fn topic_frequencies(texts: &[String], topics: &[String]) -> TopicMap<usize> {
    let mut frequencies = TopicMap::new();
    for topic in topics {
        frequencies.insert(topic.clone(), 0);
    }

    for text in texts {
        let lower = text.to_lowercase();
        for topic in topics {
            if let Some(total) = frequencies.get_mut(topic) {
                *total += count_occurrences(&lower, topic);
            }
        }
    }

    frequencies
}

fn per_paper(frequency: usize, pool_size: usize) -> f64 {
    if pool_size > 0 {
        frequency as f64 / pool_size as f64
    } else {
        0.0
    }
}

/// Score the recent pool's candidates against the comparison pool.
///
/// Pure over its inputs: document texts and candidate lists for each pool.
pub fn score_emerging(
    recent_texts: &[String],
    recent_topics: &[String],
    comparison_texts: &[String],
    comparison_topics: &[String],
    threshold: f64,
) -> TopicMap<EmergingTopic> {
    let recent_topics = dedup_topics(recent_topics);
    let comparison_topics = dedup_topics(comparison_topics);

    let recent_freq = topic_frequencies(recent_texts, &recent_topics);
    let comparison_freq = topic_frequencies(comparison_texts, &comparison_topics);

    let mut emerging = TopicMap::new();
    for topic in &recent_topics {
        let recent_rate = per_paper(
            recent_freq.get(topic).copied().unwrap_or(0),
            recent_texts.len(),
        );
        let comparison_rate = per_paper(
            comparison_freq.get(topic).copied().unwrap_or(0),
            comparison_texts.len(),
        );
        let growth = growth_rate(recent_rate, comparison_rate);

        if growth >= threshold {
            emerging.insert(
                topic.clone(),
                EmergingTopic {
                    recent_frequency: recent_rate,
                    comparison_frequency: comparison_rate,
                    growth_rate: growth,
                    is_new: comparison_rate == 0.0,
                },
            );
        }
    }

    emerging.sort_by(|a, b| {
        b.growth_rate
            .partial_cmp(&a.growth_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    emerging
}

/// Compare topic prevalence in `recent_years` against `comparison_years`.
pub async fn detect_emerging(
    session: &CorpusSession,
    extractor: &StagedExtractor,
    recent_years: &[i32],
    comparison_years: &[i32],
    threshold: f64,
) -> EmergingTopics {
    let recent_papers = session.papers_for_years(recent_years).await;
    let comparison_papers = session.papers_for_years(comparison_years).await;

    let recent_texts = document_texts(&recent_papers);
    let comparison_texts = document_texts(&comparison_papers);

    let recent_topics = extractor.extract_topics(&recent_texts, CANDIDATE_TOPICS).await;
    let comparison_topics = extractor
        .extract_topics(&comparison_texts, CANDIDATE_TOPICS)
        .await;

    let emerging_topics = score_emerging(
        &recent_texts,
        &recent_topics,
        &comparison_texts,
        &comparison_topics,
        threshold,
    );

    info!(
        recent_papers = recent_papers.len(),
        comparison_papers = comparison_papers.len(),
        candidates = recent_topics.len(),
        emerging = emerging_topics.len(),
        "Emerging topic detection complete"
    );

    EmergingTopics {
        emerging_topics,
        recent_years: recent_years.to_vec(),
        comparison_years: comparison_years.to_vec(),
        total_recent_papers: recent_papers.len(),
        total_comparison_papers: comparison_papers.len(),
    }
}
