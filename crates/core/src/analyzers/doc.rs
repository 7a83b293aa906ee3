use super::{analysis_metadata, truncate_chars, Analysis, AnalyzeError, FileAnalyzer, FileSample};
use crate::classifier::Category;
use crate::tags::extract_tags;
use providers::LlmProvider;
use std::sync::Arc;

const SAMPLE_CHARS: usize = 2000;
const SYSTEM_PROMPT: &str = "You are a documentation analysis expert. Provide concise, relevant tags and metadata for documentation files.";

pub struct DocAnalyzer {
    llm: Arc<dyn LlmProvider>,
    max_tags: usize,
}

impl DocAnalyzer {
    pub fn new(llm: Arc<dyn LlmProvider>, max_tags: usize) -> Self {
        Self { llm, max_tags }
    }
}

#[async_trait::async_trait]
impl FileAnalyzer for DocAnalyzer {
    fn name(&self) -> &'static str {
        "DocAnalyzer"
    }

    fn category(&self) -> Category {
        Category::Documentation
    }

    async fn analyze(&self, sample: FileSample<'_>) -> Result<Analysis, AnalyzeError> {
        if sample.content.is_empty() {
            return Err(AnalyzeError::EmptyContent);
        }

        let excerpt = truncate_chars(sample.content, SAMPLE_CHARS);
        let prompt = format!(
            "Analyze this documentation file and provide:\n\
             1. Document type/format\n\
             2. Main topic/subject\n\
             3. Key concepts covered\n\
             4. Target audience\n\
             5. Relevant tags (max 5)\n\
             \n\
             Content:\n{excerpt}"
        );

        let resp = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;
        Ok(Analysis {
            tags: extract_tags(&resp.text, self.max_tags),
            metadata: analysis_metadata(&sample, &resp.text),
        })
    }
}
