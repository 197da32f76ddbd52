// Trend report — one document combining every analysis over a year range.
//
// The range's papers are fetched once into a pool that provides the corpus
// totals and, when no key topics are given, the tracked topics. Trend tracking
// then covers the whole range, emerging detection compares the last two years
// against the first two, and relationships are analyzed for the final year.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use super::emerging::{detect_emerging, EmergingTopics, DEFAULT_GROWTH_THRESHOLD};
use super::relationships::{analyze_relationships, TopicRelationships, DEFAULT_MIN_COOCCURRENCE};
use super::trends::{track_trends, TrendSeries};
use super::{Outcome, YearRange};
use crate::corpus::models::{document_texts, PaperRecord};
use crate::corpus::CorpusSession;
use crate::topics::StagedExtractor;

/// Topics derived from the pooled text when the caller supplies none.
pub const KEY_TOPIC_COUNT: usize = 15;

#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub year_range: YearRange,
    pub total_papers: usize,
    /// Year -> paper count for every year in the range, ascending; empty years count 0
    pub papers_per_year: BTreeMap<i32, usize>,
    pub key_topics: Vec<String>,
    pub topic_trends: TrendSeries,
    pub emerging_topics: EmergingTopics,
    pub topic_relationships: Outcome<TopicRelationships>,
    /// RFC 3339 timestamp
    pub generated_at: String,
}

/// Paper counts for each year of `range`, zero where the pool has none.
///
/// Papers dated outside the range are not counted.
pub fn papers_per_year(papers: &[PaperRecord], range: YearRange) -> BTreeMap<i32, usize> {
    let mut counts: BTreeMap<i32, usize> = range.years().map(|year| (year, 0)).collect();
    for paper in papers {
        if let Some(count) = counts.get_mut(&paper.year) {
            *count += 1;
        }
    }
    counts
}

/// The two recent and two comparison years for a range.
///
/// For a single-year range both windows hold years outside the range; those
/// fetch like any other year and usually come back empty.
pub fn comparison_windows(range: YearRange) -> (Vec<i32>, Vec<i32>) {
    (
        vec![range.end() - 1, range.end()],
        vec![range.start(), range.start() + 1],
    )
}

/// Build the full report for `range`.
///
/// `key_topics` of `None` or an empty slice means "derive them from the pool".
pub async fn generate_report(
    session: &CorpusSession,
    extractor: &StagedExtractor,
    range: YearRange,
    key_topics: Option<&[String]>,
) -> Outcome<TrendReport> {
    let years: Vec<i32> = range.years().collect();
    let pool = session.papers_for_years(&years).await;
    if pool.is_empty() {
        return Outcome::no_data(format!("No papers found for year range {range}"));
    }

    info!(range = %range, papers = pool.len(), "Generating trend report");

    let key_topics = match key_topics {
        Some(topics) if !topics.is_empty() => topics.to_vec(),
        _ => {
            extractor
                .extract_topics(&document_texts(&pool), KEY_TOPIC_COUNT)
                .await
        }
    };

    let topic_trends = track_trends(session, &key_topics, range).await;

    let (recent_years, comparison_years) = comparison_windows(range);
    let emerging_topics = detect_emerging(
        session,
        extractor,
        &recent_years,
        &comparison_years,
        DEFAULT_GROWTH_THRESHOLD,
    )
    .await;

    let topic_relationships =
        analyze_relationships(session, extractor, range.end(), DEFAULT_MIN_COOCCURRENCE).await;

    let report = TrendReport {
        year_range: range,
        total_papers: pool.len(),
        papers_per_year: papers_per_year(&pool, range),
        key_topics,
        topic_trends,
        emerging_topics,
        topic_relationships,
        generated_at: chrono::Utc::now().to_rfc3339(),
    };

    info!(
        range = %range,
        key_topics = report.key_topics.len(),
        emerging = report.emerging_topics.emerging_topics.len(),
        "Trend report complete"
    );

    Outcome::Found(report)
}
