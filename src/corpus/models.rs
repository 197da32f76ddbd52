// Data models — the paper records that flow out of the corpus.
//
// Kept separate from the storage backends so the analysis modules can use
// them without depending on rusqlite or reqwest.

use serde::{Deserialize, Serialize};

/// A single paper as returned by the corpus for one publication year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Opaque identifier assigned by the store (UUID, OpenReview id, ...)
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    /// Generated summary, often empty for papers that haven't been summarized
    #[serde(default)]
    pub summary: String,
    pub year: i32,
    #[serde(default)]
    pub venue: String,
}

impl PaperRecord {
    /// The paper's text as used by every analysis: title, abstract and summary
    /// joined by single spaces.
    ///
    /// Empty fields still contribute their separator, so substring counts are
    /// computed over the same text no matter which fields are populated.
    pub fn document_text(&self) -> String {
        format!("{} {} {}", self.title, self.abstract_text, self.summary)
    }
}

/// Build the document texts for a slice of papers, in order.
pub fn document_texts(papers: &[PaperRecord]) -> Vec<String> {
    papers.iter().map(PaperRecord::document_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, abstract_text: &str, summary: &str) -> PaperRecord {
        PaperRecord {
            id: "p1".to_string(),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            summary: summary.to_string(),
            year: 2024,
            venue: "ICLR".to_string(),
        }
    }

    #[test]
    fn test_document_text_joins_with_single_spaces() {
        let p = paper("Title", "Abstract", "Summary");
        assert_eq!(p.document_text(), "Title Abstract Summary");
    }

    #[test]
    fn test_document_text_keeps_separators_for_empty_fields() {
        let p = paper("Title", "", "");
        assert_eq!(p.document_text(), "Title  ");
    }

    #[test]
    fn test_deserialize_uses_abstract_key() {
        let json = r#"{"id": "x", "title": "T", "abstract": "A", "year": 2023}"#;
        let p: PaperRecord = serde_json::from_str(json).unwrap();
        assert_eq!(p.abstract_text, "A");
        assert_eq!(p.summary, "");
        assert_eq!(p.venue, "");
    }
}
