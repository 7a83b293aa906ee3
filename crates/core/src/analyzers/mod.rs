//! Per-category analyzers backed by an LLM provider.
//!
//! Each analyzer owns its prompt and content sampling policy; the provider
//! is a black box returning free text.

pub mod code;
pub mod data;
pub mod doc;

use crate::classifier::Category;
use providers::ProviderError;
use std::path::Path;
use storage::models::RecordMetadata;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("empty file or unreadable content")]
    EmptyContent,
    #[error("malformed {format} content: {reason}")]
    Malformed {
        format: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Raw input handed to an analyzer: path, full text content and size in
/// bytes. Analyzers sample the content themselves.
pub struct FileSample<'a> {
    pub path: &'a Path,
    pub content: &'a str,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub tags: Vec<String>,
    pub metadata: RecordMetadata,
}

#[async_trait::async_trait]
pub trait FileAnalyzer: Send + Sync {
    fn name(&self) -> &'static str;
    fn category(&self) -> Category;
    async fn analyze(&self, sample: FileSample<'_>) -> Result<Analysis, AnalyzeError>;
}

/// Metadata shape shared by all successful analyses.
pub(crate) fn analysis_metadata(sample: &FileSample<'_>, analysis: &str) -> RecordMetadata {
    let file_type = sample
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let mut metadata = RecordMetadata::default();
    metadata.insert("file_type", serde_json::Value::String(file_type));
    metadata.insert(
        "analysis",
        serde_json::Value::String(analysis.to_string()),
    );
    metadata.insert("size", serde_json::Value::from(sample.size));
    metadata
}

/// First `limit` characters of `text`, cut on a char boundary.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
