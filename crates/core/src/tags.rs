//! Tag extraction from analyzer free text.
//!
//! A lossy heuristic over the raw response, kept apart from the analyzers'
//! output contract so it stays testable on its own.

/// Lower-cases the analysis text, splits on whitespace, keeps words longer
/// than 3 characters and truncates to `limit`.
pub fn extract_tags(analysis: &str, limit: usize) -> Vec<String> {
    analysis
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 3)
        .map(str::to_string)
        .take(limit)
        .collect()
}
