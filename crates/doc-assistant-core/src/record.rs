use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filesystem facts about a document, as returned for paths that were never indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub path: String,
    pub filename: String,
    /// Suffix including the leading dot, empty when the file has none.
    pub extension: String,
    pub size: u64,
    pub created: String,
    pub modified: String,
}

/// One indexed document or note. `id` is the canonical absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    #[serde(flatten)]
    pub file: FileMetadata,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
}

/// Result of a metadata extraction: the stored record when the path is indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentMetadata {
    Indexed(DocumentRecord),
    Unindexed(FileMetadata),
}

impl DocumentMetadata {
    pub fn is_indexed(&self) -> bool {
        matches!(self, DocumentMetadata::Indexed(_))
    }
}

/// On-disk shape of `documents.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFile {
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentRecord>,
    /// Tag to ids carrying it. An id appears at most once per tag.
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<String>>,
}
