// Corpus trait — backend-agnostic async interface to the paper store.
//
// Implementors: SqliteCorpus (local store, wraps rusqlite), WeaviateCorpus
// (remote object store over GraphQL), MemoryCorpus (fixed in-memory records).
// The analysis code never talks to a backend directly; it goes through a
// CorpusSession, which turns backend errors into empty results.

use anyhow::Result;
use async_trait::async_trait;

use super::models::PaperRecord;

#[async_trait]
pub trait Corpus: Send + Sync {
    /// Short human-readable description of where papers come from.
    fn describe(&self) -> String;

    /// Fetch up to `limit` papers whose year equals `year` exactly.
    async fn fetch_by_year(&self, year: i32, limit: usize) -> Result<Vec<PaperRecord>>;

    /// Release any connection held by the backend.
    /// Called exactly once, when the owning session closes.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
