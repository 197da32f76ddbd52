// CorpusSession — the one corpus connection an analysis run works against.
//
// Opened once at the start of a run and handed by reference to every
// analysis. Fetch failures are absorbed here: a year that can't be read is
// logged and treated as a year with no papers. `close` consumes the session,
// so no analysis borrowing it can still be running when it is released.

use anyhow::Result;
use tracing::{info, warn};

use super::models::PaperRecord;
use super::traits::Corpus;

/// Default maximum number of papers fetched per year.
pub const DEFAULT_FETCH_LIMIT: usize = 1000;

pub struct CorpusSession {
    corpus: Box<dyn Corpus>,
    fetch_limit: usize,
}

impl CorpusSession {
    pub fn new(corpus: Box<dyn Corpus>, fetch_limit: usize) -> Self {
        info!(corpus = %corpus.describe(), fetch_limit, "Opened corpus session");
        Self {
            corpus,
            fetch_limit,
        }
    }

    pub fn describe(&self) -> String {
        self.corpus.describe()
    }

    /// All papers for `year` (up to the fetch limit), or an empty vector if
    /// the corpus couldn't be queried.
    pub async fn papers_for_year(&self, year: i32) -> Vec<PaperRecord> {
        match self.corpus.fetch_by_year(year, self.fetch_limit).await {
            Ok(papers) => {
                info!(year, papers = papers.len(), "Retrieved papers");
                papers
            }
            Err(e) => {
                warn!(year, error = %e, "Failed to fetch papers, treating year as empty");
                Vec::new()
            }
        }
    }

    /// Papers for every listed year, concatenated in the order given.
    pub async fn papers_for_years(&self, years: &[i32]) -> Vec<PaperRecord> {
        let mut pool = Vec::new();
        for &year in years {
            pool.extend(self.papers_for_year(year).await);
        }
        pool
    }

    /// Release the corpus connection.
    pub async fn close(self) -> Result<()> {
        info!(corpus = %self.corpus.describe(), "Closing corpus session");
        self.corpus.close().await
    }
}
