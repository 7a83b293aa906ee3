use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Persisted outcome of analyzing one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub tags: Vec<String>,
    pub metadata: RecordMetadata,
    /// Filesystem mtime in milliseconds since the Unix epoch. Staleness
    /// signal only, not a content hash.
    pub last_modified: i64,
    /// Name of the analyzer that produced this record.
    pub agent: String,
}

impl FileRecord {
    /// Record for a failed analysis. Failed analyses never carry tags.
    pub fn failed(agent: &str, last_modified: i64, error: String) -> Self {
        Self {
            tags: Vec::new(),
            metadata: RecordMetadata {
                error: Some(error),
                extra: IndexMap::new(),
            },
            last_modified,
            agent: agent.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.metadata.error.is_some()
    }
}

/// Typed `error` field plus a free-form side-channel for analyzer extras
/// (analysis text, file size, extension, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl RecordMetadata {
    pub fn insert(&mut self, key: &str, value: serde_json::Value) {
        self.extra.insert(key.to_string(), value);
    }
}
