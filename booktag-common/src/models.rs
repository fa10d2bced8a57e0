//! Book models shared by the extractor, the taggers and the store

use serde::{Deserialize, Serialize};

/// One book from the library export.
///
/// Identity is structural: two records with the same four fields are the
/// same book as far as the store is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    /// "Last, First" form of the primary author
    #[serde(rename = "authorLF")]
    pub author_sort_key: String,
    /// Additional authors, possibly empty, possibly comma-delimited
    #[serde(rename = "additionalAuthors")]
    pub co_authors: String,
}

impl BookRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        author_sort_key: impl Into<String>,
        co_authors: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            author_sort_key: author_sort_key.into(),
            co_authors: co_authors.into(),
        }
    }
}

/// A book paired with exactly one tag (one row per book/tag pair)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedRecord {
    #[serde(flatten)]
    pub book: BookRecord,
    pub tag: String,
}

impl TaggedRecord {
    pub fn new(book: BookRecord, tag: impl Into<String>) -> Self {
        Self {
            book,
            tag: tag.into(),
        }
    }
}
