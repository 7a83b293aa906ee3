use super::{analysis_metadata, truncate_chars, Analysis, AnalyzeError, FileAnalyzer, FileSample};
use crate::classifier::Category;
use crate::tags::extract_tags;
use providers::LlmProvider;
use std::sync::Arc;

const SAMPLE_CHARS: usize = 1500;
const SYSTEM_PROMPT: &str =
    "You are a code analysis expert. Provide concise, relevant tags and metadata for code files.";

pub struct CodeAnalyzer {
    llm: Arc<dyn LlmProvider>,
    max_tags: usize,
}

impl CodeAnalyzer {
    pub fn new(llm: Arc<dyn LlmProvider>, max_tags: usize) -> Self {
        Self { llm, max_tags }
    }
}

#[async_trait::async_trait]
impl FileAnalyzer for CodeAnalyzer {
    fn name(&self) -> &'static str {
        "CodeAnalyzer"
    }

    fn category(&self) -> Category {
        Category::Code
    }

    async fn analyze(&self, sample: FileSample<'_>) -> Result<Analysis, AnalyzeError> {
        if sample.content.is_empty() {
            return Err(AnalyzeError::EmptyContent);
        }

        let excerpt = truncate_chars(sample.content, SAMPLE_CHARS);
        let prompt = format!(
            "Analyze this code file and provide:\n\
             1. Programming language\n\
             2. Main functionality/purpose\n\
             3. Key components/classes\n\
             4. Important dependencies\n\
             5. Relevant tags (max 5)\n\
             \n\
             Code:\n{excerpt}"
        );

        let resp = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;
        Ok(Analysis {
            tags: extract_tags(&resp.text, self.max_tags),
            metadata: analysis_metadata(&sample, &resp.text),
        })
    }
}
