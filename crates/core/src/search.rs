//! Tag lookup over the metadata store.

use indexmap::IndexMap;
use std::collections::HashSet;
use storage::MetadataStore;

/// Derived, in-memory, case-insensitive tag -> paths lookup. Not persisted;
/// rebuild after any merge to stay consistent with the store.
pub struct TagIndex {
    entries: IndexMap<String, Vec<String>>,
}

impl TagIndex {
    pub fn build(store: &MetadataStore) -> Self {
        let mut entries: IndexMap<String, Vec<String>> = IndexMap::new();
        for (path, record) in store.records() {
            let mut seen = HashSet::new();
            for tag in &record.tags {
                let key = tag.to_lowercase();
                if seen.insert(key.clone()) {
                    entries.entry(key).or_default().push(path.clone());
                }
            }
        }
        Self { entries }
    }

    /// Paths carrying `tag`, case-insensitive, in store iteration order.
    pub fn search(&self, tag: &str) -> Vec<String> {
        self.entries
            .get(&tag.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::{FileRecord, RecordMetadata};

    fn record(tags: &[&str]) -> FileRecord {
        FileRecord {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            metadata: RecordMetadata::default(),
            last_modified: 1,
            agent: "CodeAnalyzer".to_string(),
        }
    }

    fn store(entries: Vec<(&str, FileRecord)>) -> MetadataStore {
        let temp = tempfile::tempdir().unwrap();
        let mut store = MetadataStore::open(temp.path().join("metadata.json"));
        let mut updates = IndexMap::new();
        for (path, rec) in entries {
            updates.insert(path.to_string(), rec);
        }
        store.merge(updates);
        store
    }

    #[test]
    fn search_is_case_insensitive() {
        let store = store(vec![("/a.py", record(&["Python"]))]);
        let index = TagIndex::build(&store);
        assert_eq!(index.search("python"), vec!["/a.py"]);
        assert_eq!(index.search("PYTHON"), vec!["/a.py"]);
        assert_eq!(index.search("Python"), vec!["/a.py"]);
    }

    #[test]
    fn unknown_tag_returns_empty() {
        let store = store(vec![("/a.py", record(&["python"]))]);
        let index = TagIndex::build(&store);
        assert!(index.search("nonexistent-tag").is_empty());
    }

    #[test]
    fn paths_come_back_in_store_order() {
        let store = store(vec![
            ("/first.py", record(&["shared"])),
            ("/second.md", record(&["shared"])),
            ("/third.json", record(&["shared"])),
        ]);
        let index = TagIndex::build(&store);
        assert_eq!(
            index.search("shared"),
            vec!["/first.py", "/second.md", "/third.json"]
        );
    }

    #[test]
    fn duplicate_tags_within_a_record_index_once() {
        let store = store(vec![("/a.py", record(&["Python", "python"]))]);
        let index = TagIndex::build(&store);
        assert_eq!(index.search("python"), vec!["/a.py"]);
    }

    #[test]
    fn error_records_never_surface() {
        let store = store(vec![
            ("/ok.py", record(&["python"])),
            (
                "/broken.py",
                FileRecord::failed("CodeAnalyzer", 1, "request failed".to_string()),
            ),
        ]);
        let index = TagIndex::build(&store);
        assert_eq!(index.search("python"), vec!["/ok.py"]);
        assert!(index.search("request").is_empty());
        assert!(index.search("failed").is_empty());
    }
}
