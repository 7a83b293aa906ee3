//! Decides whether a cached record is still valid for a file.

use storage::MetadataStore;

/// True iff the store holds a record for `path` whose stored fingerprint
/// equals `fingerprint` exactly. Equality, not newer-than: a fingerprint
/// that moved backward onto a matching stale value reads as unchanged, any
/// other mismatch reads as changed.
pub fn should_skip(store: &MetadataStore, path: &str, fingerprint: i64) -> bool {
    store
        .get(path)
        .map(|record| record.last_modified == fingerprint)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use storage::models::{FileRecord, RecordMetadata};

    fn store_with(path: &str, mtime: i64) -> MetadataStore {
        let temp = tempfile::tempdir().unwrap();
        let mut store = MetadataStore::open(temp.path().join("metadata.json"));
        let mut updates = IndexMap::new();
        updates.insert(
            path.to_string(),
            FileRecord {
                tags: vec!["cached".to_string()],
                metadata: RecordMetadata::default(),
                last_modified: mtime,
                agent: "CodeAnalyzer".to_string(),
            },
        );
        store.merge(updates);
        store
    }

    #[test]
    fn unknown_path_is_processed() {
        let store = store_with("/a.py", 100);
        assert!(!should_skip(&store, "/other.py", 100));
    }

    #[test]
    fn matching_fingerprint_skips() {
        let store = store_with("/a.py", 100);
        assert!(should_skip(&store, "/a.py", 100));
    }

    #[test]
    fn any_mismatch_reprocesses() {
        let store = store_with("/a.py", 100);
        // Newer and older both count as changed.
        assert!(!should_skip(&store, "/a.py", 200));
        assert!(!should_skip(&store, "/a.py", 50));
    }
}
