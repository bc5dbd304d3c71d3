use std::fmt;

use serde::{Deserialize, Serialize};

/// A single catalogued title, keyed by its identifier (usually an ISBN)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct BookRecord {
    /// Unique identifier, compared exactly and case-sensitively
    pub id: String,
    /// Free-text title
    pub title: String,
    /// Free-text author
    pub author: String,
}

impl BookRecord {
    /// Create a new record
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), author: author.into() }
    }

    /// Whether this record's title matches `title` once both are normalized
    #[must_use]
    pub fn has_title(&self, title: &str) -> bool {
        normalize_title(&self.title) == normalize_title(title)
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} by {}", self.id, self.title, self.author)
    }
}

/// Canonical form used for every title-keyed comparison: trimmed and lowercased.
///
/// Identifiers never go through this.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
