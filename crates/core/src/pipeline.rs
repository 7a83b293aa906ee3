//! Directory processing pass: classify, change-check, analyze, persist.

use crate::analyzers::{
    code::CodeAnalyzer, data::DataAnalyzer, doc::DocAnalyzer, FileAnalyzer, FileSample,
};
use crate::change;
use crate::classifier::{self, Category};
use crate::config::AppConfig;
use crate::scanner;
use anyhow::Context;
use globset::GlobSet;
use indexmap::IndexMap;
use providers::noop::NoopProvider;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::ProviderRegistry;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use storage::models::FileRecord;
use storage::MetadataStore;
use tracing::{debug, info, warn};

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";
const CHAT_TEMPERATURE: f32 = 0.3;
const CHAT_MAX_TOKENS: u32 = 200;

/// Orchestrates one directory pass over an explicit store handle. Files are
/// handled strictly one at a time; the store is saved once per pass.
pub struct Pipeline {
    store: MetadataStore,
    analyzers: Vec<Arc<dyn FileAnalyzer>>,
    excludes: GlobSet,
}

impl Pipeline {
    pub fn new(
        store: MetadataStore,
        analyzers: Vec<Arc<dyn FileAnalyzer>>,
        exclude_patterns: &[String],
    ) -> anyhow::Result<Self> {
        let excludes = scanner::build_globset(exclude_patterns).context("build exclude globs")?;
        Ok(Self {
            store,
            analyzers,
            excludes,
        })
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// One full pass over `root`: classify each candidate, carry unchanged
    /// files forward, analyze the rest and persist the merged store at the
    /// end. Returns every record the pass produced, carried entries
    /// included. Per-file failures never abort the pass; only a missing
    /// `root` is fatal.
    pub async fn process_directory(
        &mut self,
        root: &Path,
        recursive: bool,
    ) -> anyhow::Result<IndexMap<String, FileRecord>> {
        anyhow::ensure!(root.is_dir(), "directory {} does not exist", root.display());

        let items = scanner::walk(root, recursive, &self.excludes, self.store.path());
        info!("processing {} candidate files", items.len());

        let mut results = IndexMap::new();
        let mut analyzed = 0usize;
        let mut carried = 0usize;
        let mut failed = 0usize;

        for item in items {
            let key = item.path.to_string_lossy().into_owned();

            let Some(category) = classifier::classify(&item.path) else {
                debug!("no analyzer handles {}", item.path.display());
                continue;
            };

            if change::should_skip(&self.store, &key, item.mtime) {
                if let Some(existing) = self.store.get(&key) {
                    results.insert(key, existing.clone());
                    carried += 1;
                }
                continue;
            }

            let Some(analyzer) = self.analyzer_for(category) else {
                warn!("no analyzer registered for category {}", category.label());
                continue;
            };

            let content = match fs::read_to_string(&item.path) {
                Ok(content) => content,
                Err(err) => {
                    warn!("cannot read {}: {}", item.path.display(), err);
                    continue;
                }
            };

            let record = match analyzer
                .analyze(FileSample {
                    path: &item.path,
                    content: &content,
                    size: item.size,
                })
                .await
            {
                Ok(analysis) => {
                    analyzed += 1;
                    FileRecord {
                        tags: analysis.tags,
                        metadata: analysis.metadata,
                        last_modified: item.mtime,
                        agent: analyzer.name().to_string(),
                    }
                }
                Err(err) => {
                    warn!("analysis of {} failed: {}", item.path.display(), err);
                    failed += 1;
                    FileRecord::failed(analyzer.name(), item.mtime, err.to_string())
                }
            };
            results.insert(key, record);
        }

        self.store.merge(results.clone());
        self.store.save().context("persist metadata store")?;
        info!(
            "pass complete: {} analyzed, {} unchanged, {} failed",
            analyzed, carried, failed
        );

        Ok(results)
    }

    fn analyzer_for(&self, category: Category) -> Option<&Arc<dyn FileAnalyzer>> {
        self.analyzers.iter().find(|a| a.category() == category)
    }
}

pub fn build_registry(config: &AppConfig) -> ProviderRegistry {
    let mut reg = ProviderRegistry::new().with_llm("noop", Arc::new(NoopProvider));

    if let Some(key) = std::env::var_os("OPENAI_API_KEY") {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| OPENAI_DEFAULT_BASE_URL.to_string());
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: key.to_string_lossy().into_owned(),
            base_url,
            chat_model: config.analysis.chat_model.clone(),
            temperature: CHAT_TEMPERATURE,
            max_tokens: CHAT_MAX_TOKENS,
        });
        reg = reg.with_llm("openai", Arc::new(provider));
    }

    reg.set_preferred_llm(&config.analysis.provider)
}

pub fn build_analyzers(
    config: &AppConfig,
    registry: &ProviderRegistry,
) -> anyhow::Result<Vec<Arc<dyn FileAnalyzer>>> {
    let llm = registry
        .llm(None)
        .context("no usable LLM provider; set OPENAI_API_KEY or configure analysis.provider")?;
    let max_tags = config.analysis.max_tags;
    let analyzers: Vec<Arc<dyn FileAnalyzer>> = vec![
        Arc::new(CodeAnalyzer::new(llm.clone(), max_tags)),
        Arc::new(DocAnalyzer::new(llm.clone(), max_tags)),
        Arc::new(DataAnalyzer::new(llm, max_tags)),
    ];
    Ok(analyzers)
}
