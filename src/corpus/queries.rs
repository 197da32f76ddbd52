// Corpus queries — every SQL statement against the local paper store.
//
// Keeps SQL in one place and gives the rest of the crate plain Rust
// functions over a borrowed Connection.

use anyhow::Result;
use rusqlite::{params, Connection};

use super::models::PaperRecord;

/// Insert a paper, replacing any existing row with the same id.
pub fn upsert_paper(conn: &Connection, paper: &PaperRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO papers (id, title, abstract, summary, year, venue, imported_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))
         ON CONFLICT(id) DO UPDATE SET
            title = ?2,
            abstract = ?3,
            summary = ?4,
            year = ?5,
            venue = ?6,
            imported_at = datetime('now')",
        params![
            paper.id,
            paper.title,
            paper.abstract_text,
            paper.summary,
            paper.year,
            paper.venue,
        ],
    )?;
    Ok(())
}

/// Fetch up to `limit` papers published in exactly `year`, in id order.
pub fn fetch_by_year(conn: &Connection, year: i32, limit: usize) -> Result<Vec<PaperRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, abstract, summary, year, venue
         FROM papers
         WHERE year = ?1
         ORDER BY id
         LIMIT ?2",
    )?;

    // SQLite LIMIT is a signed 64-bit integer
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let rows = stmt.query_map(params![year, limit], |row| {
        Ok(PaperRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            abstract_text: row.get(2)?,
            summary: row.get(3)?,
            year: row.get(4)?,
            venue: row.get(5)?,
        })
    })?;

    let mut papers = Vec::new();
    for row in rows {
        papers.push(row?);
    }
    Ok(papers)
}

/// Total number of papers in the store.
pub fn paper_count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM papers", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// Paper counts grouped by publication year, oldest first.
pub fn year_counts(conn: &Connection) -> Result<Vec<(i32, u64)>> {
    let mut stmt =
        conn.prepare("SELECT year, COUNT(*) FROM papers GROUP BY year ORDER BY year")?;
    let rows = stmt.query_map([], |row| {
        let year: i32 = row.get(0)?;
        let count: i64 = row.get(1)?;
        Ok((year, count as u64))
    })?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::schema::create_tables;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn paper(id: &str, year: i32, title: &str) -> PaperRecord {
        PaperRecord {
            id: id.to_string(),
            title: title.to_string(),
            abstract_text: "abstract".to_string(),
            summary: String::new(),
            year,
            venue: "NeurIPS".to_string(),
        }
    }

    #[test]
    fn test_upsert_and_fetch_by_year() {
        let conn = test_conn();
        upsert_paper(&conn, &paper("a", 2023, "First")).unwrap();
        upsert_paper(&conn, &paper("b", 2024, "Second")).unwrap();

        let papers = fetch_by_year(&conn, 2023, 100).unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].title, "First");
        assert_eq!(papers[0].abstract_text, "abstract");
        assert_eq!(papers[0].venue, "NeurIPS");
    }

    #[test]
    fn test_upsert_replaces_existing_id() {
        let conn = test_conn();
        upsert_paper(&conn, &paper("a", 2023, "Draft")).unwrap();
        upsert_paper(&conn, &paper("a", 2024, "Final")).unwrap();

        assert_eq!(paper_count(&conn).unwrap(), 1);
        assert!(fetch_by_year(&conn, 2023, 100).unwrap().is_empty());
        assert_eq!(fetch_by_year(&conn, 2024, 100).unwrap()[0].title, "Final");
    }

    #[test]
    fn test_fetch_respects_limit() {
        let conn = test_conn();
        for i in 0..5 {
            upsert_paper(&conn, &paper(&format!("p{i}"), 2022, "T")).unwrap();
        }
        assert_eq!(fetch_by_year(&conn, 2022, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_year_counts_grouped_and_sorted() {
        let conn = test_conn();
        upsert_paper(&conn, &paper("a", 2024, "T")).unwrap();
        upsert_paper(&conn, &paper("b", 2022, "T")).unwrap();
        upsert_paper(&conn, &paper("c", 2024, "T")).unwrap();

        assert_eq!(year_counts(&conn).unwrap(), vec![(2022, 1), (2024, 2)]);
    }
}
