// Topic evolution analyses — trends, emerging topics, co-occurrence, reports.
//
// Every analysis reads papers through a CorpusSession and asks a
// StagedExtractor for topics. None of them write anything; the CLI decides
// what to persist.

pub mod emerging;
pub mod relationships;
pub mod report;
pub mod trends;

use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};

/// An inclusive range of publication years with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> anyhow::Result<Self> {
        if start > end {
            anyhow::bail!("Invalid year range: start year {start} is after end year {end}");
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Every year in the range, oldest first.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// Serialized as a two-element array: [start, end]
impl Serialize for YearRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.start)?;
        tuple.serialize_element(&self.end)?;
        tuple.end()
    }
}

/// Result of an analysis that needs papers to exist.
///
/// `NoData` means the analysis ran and found nothing to work with; it is a
/// value, not an error. Serialized untagged, so a `NoData` shows up as
/// `{"error": "..."}` in place of the result object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Found(T),
    NoData(NoData),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoData {
    pub error: String,
}

impl<T> Outcome<T> {
    pub fn no_data(error: impl Into<String>) -> Self {
        Outcome::NoData(NoData {
            error: error.into(),
        })
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::NoData(_) => None,
        }
    }

    pub fn into_found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::NoData(_) => None,
        }
    }
}

/// A topic-keyed map that keeps insertion order.
///
/// Topic order carries meaning (extractor rank, growth rank), so results use
/// this instead of a HashMap. Serializes as a JSON object in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for TopicMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> TopicMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `topic`, replacing an existing entry in place.
    pub fn insert(&mut self, topic: impl Into<String>, value: V) {
        let topic = topic.into();
        match self.entries.iter_mut().find(|(t, _)| *t == topic) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((topic, value)),
        }
    }

    pub fn get(&self, topic: &str) -> Option<&V> {
        self.entries.iter().find(|(t, _)| t == topic).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, topic: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(t, _)| t == topic)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.get(topic).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v))
    }

    /// Stable sort of the entries; equal entries keep their current order.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&V, &V) -> std::cmp::Ordering) {
        self.entries.sort_by(|a, b| compare(&a.1, &b.1));
    }
}

impl<V: Serialize> Serialize for TopicMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (topic, value) in &self.entries {
            map.serialize_entry(topic, value)?;
        }
        map.end()
    }
}

/// Number of non-overlapping occurrences of `topic` in `text`, ignoring case.
///
/// `text` must already be lowercase; the topic is lowercased here.
pub fn count_occurrences(lowercase_text: &str, topic: &str) -> usize {
    lowercase_text.matches(topic.to_lowercase().as_str()).count()
}

/// Drop repeated topics, keeping the first occurrence of each exact string.
pub fn dedup_topics(topics: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    topics
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_rejects_reversed() {
        assert!(YearRange::new(2024, 2020).is_err());
        let range = YearRange::new(2020, 2022).unwrap();
        assert_eq!(range.years().collect::<Vec<_>>(), vec![2020, 2021, 2022]);
    }

    #[test]
    fn test_year_range_serializes_as_pair() {
        let range = YearRange::new(2020, 2024).unwrap();
        assert_eq!(serde_json::to_string(&range).unwrap(), "[2020,2024]");
    }

    #[test]
    fn test_outcome_no_data_serializes_as_error_object() {
        let outcome: Outcome<u32> = Outcome::no_data("No papers found for year 2024");
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"error":"No papers found for year 2024"}"#
        );
        assert_eq!(serde_json::to_string(&Outcome::Found(3u32)).unwrap(), "3");
    }

    #[test]
    fn test_topic_map_keeps_insertion_order() {
        let mut map = TopicMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        map.insert("zeta", 3);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(map.get("zeta"), Some(&3));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"zeta":3,"alpha":2}"#);
    }

    #[test]
    fn test_count_occurrences_case_insensitive_non_overlapping() {
        assert_eq!(count_occurrences("diffusion models and diffusion", "Diffusion"), 2);
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("graphs", "transformer"), 0);
    }

    #[test]
    fn test_dedup_topics_keeps_first() {
        let topics = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(dedup_topics(&topics), vec!["a", "b"]);
    }
}
