use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::reader::RecordReader;
use crate::record::RawRecord;

/// Corpus-wide entity-type counts, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    /// Maps entity type -> position in `entries`
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entity_type: &str) {
        self.add(entity_type, 1);
    }

    /// One increment per annotation, regardless of how many values it carries.
    pub fn observe(&mut self, record: &RawRecord) {
        for entity_type in record.entity_types() {
            self.record(entity_type);
        }
    }

    pub fn add(&mut self, entity_type: &str, count: u64) {
        match self.index.get(entity_type) {
            Some(&pos) => self.entries[pos].1 += count,
            None => {
                self.index.insert(entity_type.to_string(), self.entries.len());
                self.entries.push((entity_type.to_string(), count));
            }
        }
    }

    pub fn merge(&mut self, other: &FrequencyTable) {
        for (entity_type, count) in other.iter() {
            self.add(entity_type, count);
        }
    }

    pub fn get(&self, entity_type: &str) -> u64 {
        self.index
            .get(entity_type)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// Top `k` types by count; ties keep first-seen order.
    pub fn most_common(&self, k: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

impl PartialEq for FrequencyTable {
    /// Equal when the counts agree, whatever order types were first seen in.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(t, c)| other.get(t) == c)
    }
}

impl Eq for FrequencyTable {}

pub fn build_frequency_table<'a>(records: impl IntoIterator<Item = &'a RawRecord>) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for record in records {
        table.observe(record);
    }
    table
}

/// First pass over a JSONL corpus. Fails on the first malformed line.
pub async fn count_file(path: &Path, top_k: usize) -> Result<FrequencyTable> {
    let mut reader = RecordReader::open(path).await?;
    let mut table = FrequencyTable::new();
    let mut records = 0usize;

    while let Some(record) = reader.next_record().await? {
        table.observe(&record);
        records += 1;
    }

    info!(
        records,
        entity_types = table.len(),
        annotations = table.total(),
        "Counted entity types"
    );
    if top_k > 0 {
        info!(top = ?table.most_common(top_k), "Top-{} entity types", top_k);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EntityAnnotation;

    fn record(types: &[(&str, usize)]) -> RawRecord {
        let entities = types
            .iter()
            .map(|(t, n)| EntityAnnotation::new(*t, (0..*n).map(|i| format!("v{}", i)).collect()))
            .collect();
        RawRecord::new("text", entities)
    }

    #[test]
    fn test_counts_annotations_not_values() {
        let corpus = vec![
            record(&[("person", 3), ("city", 1)]),
            record(&[("person", 1)]),
            record(&[]),
        ];
        let table = build_frequency_table(&corpus);

        assert_eq!(table.get("person"), 2);
        assert_eq!(table.get("city"), 1);
        assert_eq!(table.get("org"), 0);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_first_seen_order() {
        let corpus = vec![record(&[("b", 1), ("a", 1)]), record(&[("c", 1), ("a", 1)])];
        let table = build_frequency_table(&corpus);
        let types: Vec<&str> = table.iter().map(|(t, _)| t).collect();
        assert_eq!(types, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_most_common_ties_keep_first_seen() {
        let corpus = vec![
            record(&[("x", 1), ("y", 1), ("z", 1)]),
            record(&[("z", 1)]),
        ];
        let table = build_frequency_table(&corpus);
        assert_eq!(table.most_common(2), vec![("z", 2), ("x", 1)]);
        assert_eq!(table.most_common(10).len(), 3);
    }

    #[test]
    fn test_order_independent() {
        let corpus = vec![
            record(&[("person", 1), ("city", 1)]),
            record(&[("org", 2)]),
            record(&[("city", 1), ("date", 1)]),
            record(&[("person", 4)]),
        ];
        let forward = build_frequency_table(&corpus);
        let backward = build_frequency_table(corpus.iter().rev());
        let rotated = build_frequency_table(corpus[2..].iter().chain(&corpus[..2]));

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let corpus = vec![record(&[("a", 1)]), record(&[("b", 1), ("a", 1)])];
        let mut left = build_frequency_table(&corpus[..1]);
        let right = build_frequency_table(&corpus[1..]);
        left.merge(&right);
        assert_eq!(left, build_frequency_table(&corpus));
    }

    #[tokio::test]
    async fn test_count_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"text": "A", "entities": [["person", ["A"]]]}}"#).unwrap();
        writeln!(file, r#"{{"text": "B", "entities": [["person", ["B"]], ["city", ["C"]]]}}"#).unwrap();

        let table = count_file(file.path(), 10).await.unwrap();
        assert_eq!(table.get("person"), 2);
        assert_eq!(table.get("city"), 1);
    }

    #[tokio::test]
    async fn test_count_file_fails_on_malformed_line() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"text": "A", "entities": []}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        assert!(count_file(file.path(), 10).await.is_err());
    }
}
