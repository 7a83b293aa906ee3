use super::{analysis_metadata, truncate_chars, Analysis, AnalyzeError, FileAnalyzer, FileSample};
use crate::classifier::Category;
use crate::tags::extract_tags;
use providers::LlmProvider;
use serde_json::Value;
use std::sync::Arc;

const SAMPLE_CHARS: usize = 1500;
const SAMPLE_ENTRIES: usize = 5;
const SAMPLE_COLUMNS: usize = 10;
const SAMPLE_ROWS: usize = 3;
const SYSTEM_PROMPT: &str =
    "You are a data analysis expert. Provide concise, relevant tags and metadata for data files.";

pub struct DataAnalyzer {
    llm: Arc<dyn LlmProvider>,
    max_tags: usize,
}

impl DataAnalyzer {
    pub fn new(llm: Arc<dyn LlmProvider>, max_tags: usize) -> Self {
        Self { llm, max_tags }
    }
}

#[async_trait::async_trait]
impl FileAnalyzer for DataAnalyzer {
    fn name(&self) -> &'static str {
        "DataAnalyzer"
    }

    fn category(&self) -> Category {
        Category::Data
    }

    async fn analyze(&self, sample: FileSample<'_>) -> Result<Analysis, AnalyzeError> {
        if sample.content.is_empty() {
            return Err(AnalyzeError::EmptyContent);
        }

        let ext = sample
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        let preview = match ext.as_deref() {
            Some("json") => json_sample(sample.content)?,
            Some("csv") => csv_sample(sample.content)?,
            _ => truncate_chars(sample.content, SAMPLE_CHARS).to_string(),
        };

        let prompt = format!(
            "Analyze this data file and provide:\n\
             1. Data format/structure\n\
             2. Key data fields/columns\n\
             3. Data purpose/content type\n\
             4. Data characteristics\n\
             5. Relevant tags (max 5)\n\
             \n\
             Sample data:\n{preview}"
        );

        let resp = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;
        Ok(Analysis {
            tags: extract_tags(&resp.text, self.max_tags),
            metadata: analysis_metadata(&sample, &resp.text),
        })
    }
}

/// First few entries of a JSON document. Malformed JSON is an analyzer
/// failure, not a pass failure.
fn json_sample(content: &str) -> Result<String, AnalyzeError> {
    let value: Value = serde_json::from_str(content).map_err(|e| AnalyzeError::Malformed {
        format: "json",
        reason: e.to_string(),
    })?;
    let reduced = match value {
        Value::Object(map) => Value::Object(map.into_iter().take(SAMPLE_ENTRIES).collect()),
        Value::Array(items) => Value::Array(items.into_iter().take(SAMPLE_ENTRIES).collect()),
        other => other,
    };
    Ok(reduced.to_string())
}

/// Leading column names plus the first rows of a CSV document.
fn csv_sample(content: &str) -> Result<String, AnalyzeError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| AnalyzeError::Malformed {
            format: "csv",
            reason: e.to_string(),
        })?
        .iter()
        .take(SAMPLE_COLUMNS)
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records().take(SAMPLE_ROWS) {
        let record = result.map_err(|e| AnalyzeError::Malformed {
            format: "csv",
            reason: e.to_string(),
        })?;
        rows.push(record.iter().collect::<Vec<_>>().join(", "));
    }

    Ok(format!(
        "Columns: {}\nSample rows:\n{}",
        columns.join(", "),
        rows.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_sample_keeps_leading_entries() {
        let content = r#"{"a":1,"b":2,"c":3,"d":4,"e":5,"f":6,"g":7}"#;
        let sample = json_sample(content).unwrap();
        let value: Value = serde_json::from_str(&sample).unwrap();
        assert_eq!(value.as_object().unwrap().len(), SAMPLE_ENTRIES);
        assert!(value.get("a").is_some());
        assert!(value.get("g").is_none());
    }

    #[test]
    fn json_array_sample_keeps_leading_elements() {
        let sample = json_sample("[1,2,3,4,5,6,7,8]").unwrap();
        let value: Value = serde_json::from_str(&sample).unwrap();
        assert_eq!(value.as_array().unwrap().len(), SAMPLE_ENTRIES);
    }

    #[test]
    fn malformed_json_is_an_analyzer_failure() {
        let err = json_sample("{broken").unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::Malformed { format: "json", .. }
        ));
    }

    #[test]
    fn csv_sample_lists_columns_and_rows() {
        let content = "name,age,city\nana,30,lisbon\nbob,41,porto\ncd,12,faro\nde,99,beja\n";
        let sample = csv_sample(content).unwrap();
        assert!(sample.starts_with("Columns: name, age, city"));
        assert!(sample.contains("ana, 30, lisbon"));
        // Only the first rows are sampled.
        assert!(!sample.contains("beja"));
    }
}
