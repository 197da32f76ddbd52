// Trend tracking — per-year mention counts for a fixed set of topics.
//
// For every year in the range the year's papers are joined into one
// lowercase text and each topic's occurrences are counted in it. A year with
// no papers at all is skipped (no entry for any topic); a year with papers
// but no mentions of a topic still gets a zero entry for that topic.

use serde::Serialize;

use super::{count_occurrences, dedup_topics, TopicMap, YearRange};
use crate::corpus::models::PaperRecord;
use crate::corpus::CorpusSession;

/// One topic's prevalence in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    /// Occurrences of the topic in the year's combined text
    pub count: usize,
    /// `count / papers_that_year * 100`
    pub percentage: f64,
}

/// Topic -> points in ascending year order, restricted to years with papers.
pub type TrendSeries = TopicMap<Vec<TrendPoint>>;

/// The lowercase concatenation of every paper's document text.
pub fn combined_lowercase_text(papers: &[PaperRecord]) -> String {
    papers
        .iter()
        .map(PaperRecord::document_text)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Points for each topic in one year's papers.
///
/// Returns None for a year without papers, which callers skip.
pub fn year_points(topics: &[String], year: i32, papers: &[PaperRecord]) -> Option<Vec<TrendPoint>> {
    if papers.is_empty() {
        return None;
    }

    let text = combined_lowercase_text(papers);
    let paper_count = papers.len() as f64;

    Some(
        topics
            .iter()
            .map(|topic| {
                let count = count_occurrences(&text, topic);
                TrendPoint {
                    year,
                    count,
                    percentage: count as f64 / paper_count * 100.0,
                }
            })
            .collect(),
    )
}

/// Track `topics` over every year in `range`.
///
/// Repeated topic strings are tracked once. Topics keep their given order.
pub async fn track_trends(session: &CorpusSession, topics: &[String], range: YearRange) -> TrendSeries {
    let topics = dedup_topics(topics);

    let mut series = TrendSeries::new();
    for topic in &topics {
        series.insert(topic.clone(), Vec::new());
    }

    for year in range.years() {
        let papers = session.papers_for_year(year).await;
        let Some(points) = year_points(&topics, year, &papers) else {
            continue;
        };

        for (topic, point) in topics.iter().zip(points) {
            if let Some(points) = series.get_mut(topic) {
                points.push(point);
            }
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str) -> PaperRecord {
        PaperRecord {
            id: title.to_string(),
            title: title.to_string(),
            abstract_text: String::new(),
            summary: String::new(),
            year: 2024,
            venue: String::new(),
        }
    }

    #[test]
    fn test_year_points_empty_year_is_skipped() {
        assert!(year_points(&["x".to_string()], 2024, &[]).is_none());
    }

    #[test]
    fn test_year_points_percentage() {
        let papers = vec![paper("Diffusion Models"), paper("diffusion models again"), paper("GANs")];
        let points = year_points(&["diffusion models".to_string()], 2024, &papers).unwrap();
        assert_eq!(points[0].count, 2);
        assert!((points[0].percentage - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_year_points_zero_mentions_still_reported() {
        let papers = vec![paper("GANs")];
        let points = year_points(&["transformers".to_string()], 2024, &papers).unwrap();
        assert_eq!(
            points,
            vec![TrendPoint {
                year: 2024,
                count: 0,
                percentage: 0.0
            }]
        );
    }

    #[test]
    fn test_combined_text_keeps_empty_field_separators() {
        let papers = vec![paper("deep"), paper("learning")];
        let text = combined_lowercase_text(&papers);
        assert_eq!(text, "deep   learning  ");
    }
}
