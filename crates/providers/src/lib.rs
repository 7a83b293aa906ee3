//! Provider abstractions for LLM text analysis.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod noop;
pub mod openai;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
}

#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str)
        -> Result<CompletionResponse, ProviderError>;
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    llms: HashMap<String, Arc<dyn LlmProvider>>,
    pub preferred_llm: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_llm(mut self, name: &str, provider: Arc<dyn LlmProvider>) -> Self {
        self.llms.insert(name.to_string(), provider);
        self
    }

    pub fn set_preferred_llm(mut self, name: &str) -> Self {
        self.preferred_llm = Some(name.to_string());
        self
    }

    pub fn llm(&self, name: Option<&str>) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred_llm.clone())
            .ok_or_else(|| ProviderError::UnknownProvider("no llm provider configured".into()))?;
        self.llms
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noop::NoopProvider;

    #[test]
    fn registry_resolves_named_and_preferred() {
        let registry = ProviderRegistry::new()
            .with_llm("noop", Arc::new(NoopProvider))
            .set_preferred_llm("noop");
        assert!(registry.llm(Some("noop")).is_ok());
        assert!(registry.llm(None).is_ok());
    }

    #[test]
    fn registry_rejects_unknown_provider() {
        let registry = ProviderRegistry::new().with_llm("noop", Arc::new(NoopProvider));
        let result = registry.llm(Some("missing"));
        assert!(matches!(result, Err(ProviderError::UnknownProvider(_))));
        // No preferred provider configured either.
        assert!(registry.llm(None).is_err());
    }

    #[tokio::test]
    async fn noop_provider_is_not_implemented() {
        let err = NoopProvider
            .complete("system", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotImplemented));
    }
}
