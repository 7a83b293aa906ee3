//! Storage layer: flat JSON metadata store.
//!
//! One JSON object on disk mapping path strings to [`models::FileRecord`].
//! Loaded wholesale at construction, mutated in memory, rewritten in full
//! on save.

pub mod models;

use anyhow::Context;
use indexmap::IndexMap;
use models::FileRecord;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct MetadataStore {
    path: PathBuf,
    records: IndexMap<String, FileRecord>,
}

impl MetadataStore {
    /// Opens the store at `path`. A missing file yields an empty store; an
    /// unreadable or corrupt file is logged and treated the same way.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(records) => records,
                Err(err) => {
                    warn!(
                        "ignoring corrupt metadata store {}: {}",
                        path.display(),
                        err
                    );
                    IndexMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(err) => {
                warn!(
                    "ignoring unreadable metadata store {}: {}",
                    path.display(),
                    err
                );
                IndexMap::new()
            }
        };
        Self { path, records }
    }

    /// Serializes the full mapping, replacing any existing store file.
    /// Writes to a temp file in the store's directory and renames it into
    /// place so a reader never observes a half-written file.
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), &self.records)
            .context("serialize metadata store")?;
        tmp.persist(&self.path)
            .with_context(|| format!("persist metadata store {}", self.path.display()))?;
        Ok(())
    }

    /// Folds `updates` into the mapping, update entries winning on key
    /// collision. Records not present in `updates` are untouched.
    pub fn merge(&mut self, updates: IndexMap<String, FileRecord>) {
        for (path, record) in updates {
            self.records.insert(path, record);
        }
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn records(&self) -> &IndexMap<String, FileRecord> {
        &self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordMetadata;

    fn record(tag: &str, mtime: i64) -> FileRecord {
        FileRecord {
            tags: vec![tag.to_string()],
            metadata: RecordMetadata::default(),
            last_modified: mtime,
            agent: "CodeAnalyzer".to_string(),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = MetadataStore::open(temp.path().join("metadata.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("metadata.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = MetadataStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("metadata.json");

        let mut store = MetadataStore::open(&path);
        let mut updates = IndexMap::new();
        updates.insert("/a.py".to_string(), record("python", 100));
        updates.insert("/b.md".to_string(), record("docs", 200));
        store.merge(updates);
        store.save().unwrap();

        let reloaded = MetadataStore::open(&path);
        assert_eq!(reloaded.records(), store.records());
        // Insertion order survives the round trip.
        let keys: Vec<_> = reloaded.records().keys().cloned().collect();
        assert_eq!(keys, vec!["/a.py", "/b.md"]);
    }

    #[test]
    fn error_record_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("metadata.json");

        let mut store = MetadataStore::open(&path);
        let mut updates = IndexMap::new();
        updates.insert(
            "/a.py".to_string(),
            FileRecord::failed("CodeAnalyzer", 100, "request failed: timeout".to_string()),
        );
        store.merge(updates);
        store.save().unwrap();

        let reloaded = MetadataStore::open(&path);
        let rec = reloaded.get("/a.py").unwrap();
        assert!(rec.is_error());
        assert!(rec.tags.is_empty());
    }

    #[test]
    fn merge_overwrites_colliding_keys_only() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = MetadataStore::open(temp.path().join("metadata.json"));

        let mut first = IndexMap::new();
        first.insert("/a.py".to_string(), record("old", 100));
        first.insert("/b.md".to_string(), record("kept", 200));
        store.merge(first);

        let mut second = IndexMap::new();
        second.insert("/a.py".to_string(), record("new", 300));
        store.merge(second);

        assert_eq!(store.get("/a.py").unwrap().tags, vec!["new"]);
        assert_eq!(store.get("/a.py").unwrap().last_modified, 300);
        assert_eq!(store.get("/b.md").unwrap().tags, vec!["kept"]);
    }
}
