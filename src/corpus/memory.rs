// MemoryCorpus — a fixed set of papers held in memory.
//
// Used by the tests and by callers that already have their records loaded
// (e.g. from a JSON export) and just want to run the analyses over them.

use anyhow::Result;
use async_trait::async_trait;

use super::models::PaperRecord;
use super::traits::Corpus;

#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    papers: Vec<PaperRecord>,
}

impl MemoryCorpus {
    pub fn new(papers: Vec<PaperRecord>) -> Self {
        Self { papers }
    }
}

#[async_trait]
impl Corpus for MemoryCorpus {
    fn describe(&self) -> String {
        format!("in-memory corpus ({} papers)", self.papers.len())
    }

    async fn fetch_by_year(&self, year: i32, limit: usize) -> Result<Vec<PaperRecord>> {
        Ok(self
            .papers
            .iter()
            .filter(|p| p.year == year)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, year: i32) -> PaperRecord {
        PaperRecord {
            id: id.to_string(),
            title: format!("Paper {id}"),
            abstract_text: String::new(),
            summary: String::new(),
            year,
            venue: String::new(),
        }
    }

    #[tokio::test]
    async fn test_fetch_filters_by_exact_year() {
        let corpus = MemoryCorpus::new(vec![paper("a", 2023), paper("b", 2024), paper("c", 2023)]);
        let papers = corpus.fetch_by_year(2023, 100).await.unwrap();
        let ids: Vec<&str> = papers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_fetch_respects_limit() {
        let corpus = MemoryCorpus::new(vec![paper("a", 2023), paper("b", 2023), paper("c", 2023)]);
        assert_eq!(corpus.fetch_by_year(2023, 2).await.unwrap().len(), 2);
    }
}
