//! Maps file extensions to content categories.

use std::path::Path;

/// Content category routing a file to one analyzer. Declaration order is
/// the match priority; extension sets are disjoint by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Code,
    Documentation,
    Data,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Code, Category::Documentation, Category::Data];

    /// Recognized extensions, lower case, no leading dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Code => &["py", "js", "java", "cpp", "ts", "go", "rs"],
            Category::Documentation => &["md", "txt", "rst", "pdf", "doc", "docx"],
            Category::Data => &["json", "csv", "xlsx", "xml", "yaml", "yml"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Code => "code",
            Category::Documentation => "documentation",
            Category::Data => "data",
        }
    }
}

/// First category whose extension set contains the path's suffix,
/// case-insensitive. `None` means the file is unhandled and the caller
/// drops it without recording anything.
pub fn classify(path: &Path) -> Option<Category> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    Category::ALL
        .iter()
        .copied()
        .find(|c| c.extensions().contains(&ext.as_str()))
}
