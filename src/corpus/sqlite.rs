// SqliteCorpus — rusqlite backend implementing the Corpus trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The connection sits in an Option so `close` can hand it back to rusqlite
// exactly once; any fetch after that is an error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

use super::models::PaperRecord;
use super::traits::Corpus;

pub struct SqliteCorpus {
    conn: Mutex<Option<Connection>>,
    path: String,
}

impl SqliteCorpus {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection, path: &str) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
            path: path.to_string(),
        }
    }

    /// Open (or create) the corpus file and make sure the tables exist.
    pub fn initialize(db_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory for corpus: {}", db_path)
                })?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open corpus at {}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        super::schema::create_tables(&conn)?;

        Ok(Self::new(conn, db_path))
    }

    /// Open an existing corpus (fails if it doesn't exist yet).
    pub fn open(db_path: &str) -> Result<Self> {
        if !Path::new(db_path).exists() {
            anyhow::bail!(
                "Corpus not found at {}. Run `trendline init` and `trendline import` first.",
                db_path
            );
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open corpus at {}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self::new(conn, db_path))
    }

    /// In-memory corpus with the schema applied, for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::schema::create_tables(&conn)?;
        Ok(Self::new(conn, ":memory:"))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `f` against the open connection, or fail if the corpus was closed.
    async fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self.conn.lock().await;
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => anyhow::bail!("Corpus connection to {} is already closed", self.path),
        }
    }

    pub async fn upsert_paper(&self, paper: &PaperRecord) -> Result<()> {
        self.with_conn(|conn| super::queries::upsert_paper(conn, paper))
            .await
    }

    pub async fn paper_count(&self) -> Result<u64> {
        self.with_conn(super::queries::paper_count).await
    }

    pub async fn year_counts(&self) -> Result<Vec<(i32, u64)>> {
        self.with_conn(super::queries::year_counts).await
    }

    pub async fn table_count(&self) -> Result<i64> {
        self.with_conn(super::schema::table_count).await
    }
}

#[async_trait]
impl Corpus for SqliteCorpus {
    fn describe(&self) -> String {
        format!("SQLite corpus at {}", self.path)
    }

    async fn fetch_by_year(&self, year: i32, limit: usize) -> Result<Vec<PaperRecord>> {
        debug!(year, limit, "SQLite fetch_by_year");
        self.with_conn(|conn| super::queries::fetch_by_year(conn, year, limit))
            .await
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.close()
                .map_err(|(_, e)| e)
                .with_context(|| format!("Failed to close corpus at {}", self.path))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, year: i32) -> PaperRecord {
        PaperRecord {
            id: id.to_string(),
            title: "Diffusion models for audio".to_string(),
            abstract_text: String::new(),
            summary: String::new(),
            year,
            venue: String::new(),
        }
    }

    #[tokio::test]
    async fn test_trait_fetch_by_year() {
        let corpus = SqliteCorpus::in_memory().unwrap();
        corpus.upsert_paper(&paper("a", 2023)).await.unwrap();
        corpus.upsert_paper(&paper("b", 2024)).await.unwrap();

        let papers = corpus.fetch_by_year(2024, 10).await.unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].id, "b");
    }

    #[tokio::test]
    async fn test_fetch_after_close_fails() {
        let corpus = SqliteCorpus::in_memory().unwrap();
        corpus.close().await.unwrap();
        assert!(corpus.fetch_by_year(2024, 10).await.is_err());
        // A second close is a no-op
        corpus.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_counts() {
        let corpus = SqliteCorpus::in_memory().unwrap();
        corpus.upsert_paper(&paper("a", 2023)).await.unwrap();
        corpus.upsert_paper(&paper("b", 2023)).await.unwrap();
        assert_eq!(corpus.paper_count().await.unwrap(), 2);
        assert_eq!(corpus.year_counts().await.unwrap(), vec![(2023, 2)]);
        assert_eq!(corpus.table_count().await.unwrap(), 2);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let result = SqliteCorpus::open("/nonexistent/dir/trendline.db");
        assert!(result.is_err());
    }
}
