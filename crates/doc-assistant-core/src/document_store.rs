use crate::content_extractor::{extract_file_metadata, extract_text_from_file, now_timestamp};
use crate::error::DocumentError;
use crate::note::{note_filename, render_note};
use crate::record::{DocumentMetadata, DocumentRecord, IndexFile};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub const INDEX_FILE_NAME: &str = "documents.json";

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Flat-file catalog of indexed documents and notes.
///
/// The whole index lives in memory and is rewritten to `documents.json` after
/// every mutation. Nothing guards the file against other processes: the last
/// writer wins.
pub struct DocumentStore {
    storage_dir: PathBuf,
    index_file: PathBuf,
    // Held for the whole of each operation, including the rewrite of the index file
    index: Mutex<IndexFile>,
}

impl DocumentStore {
    /// Creates both directories if needed and loads the index.
    ///
    /// A missing or unreadable index starts the store empty instead of failing.
    pub fn open(storage_dir: impl Into<PathBuf>, index_dir: impl AsRef<Path>) -> Result<Self> {
        let storage_dir = storage_dir.into();
        let index_dir = index_dir.as_ref();
        for dir in [storage_dir.as_path(), index_dir] {
            fs::create_dir_all(dir).map_err(|e| {
                DocumentError::index(
                    format!("Failed to create directory: {e}"),
                    Some(dir.to_string_lossy().into_owned()),
                )
            })?;
        }

        let index_file = index_dir.join(INDEX_FILE_NAME);
        let index = load_index(&index_file);
        debug!(
            "Opened document store at {:?} with {} documents",
            index_file,
            index.documents.len()
        );

        Ok(Self {
            storage_dir,
            index_file,
            index: Mutex::new(index),
        })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn index_file(&self) -> &Path {
        &self.index_file
    }

    /// Indexes the file at `path` under its canonical path and returns that id.
    ///
    /// Re-indexing overwrites the record. Tags dropped from the record keep
    /// their tag-to-id association until [`DocumentStore::compact_tags`] runs.
    pub async fn index_document(&self, path: &str, tags: Vec<String>) -> Result<String> {
        let mut index = self.index.lock().await;
        self.index_locked(&mut index, path, tags)
    }

    /// Writes a markdown note into the storage directory and indexes it.
    ///
    /// Returns the note's path as written, not canonicalized.
    pub async fn create_note(&self, title: &str, content: &str, tags: Vec<String>) -> Result<String> {
        let note_path = self.storage_dir.join(note_filename(title));
        let body = render_note(title, &now_timestamp(), &tags, content);

        let mut index = self.index.lock().await;
        fs::write(&note_path, body).map_err(|e| {
            error!("Failed to create note {:?}: {}", note_path, e);
            DocumentError::index(format!("Failed to create note: {e}"), None)
        })?;

        let note_path = note_path.to_string_lossy().into_owned();
        self.index_locked(&mut index, &note_path, tags)?;

        info!("Created note: {}", note_path);
        Ok(note_path)
    }

    /// Case-insensitive substring search over filenames and tags.
    ///
    /// `tags` narrows the candidates to records sharing at least one of them.
    /// Results come back in index order and the scan stops at `limit` matches.
    pub async fn search_documents(
        &self,
        query: &str,
        tags: &[String],
        limit: usize,
    ) -> Result<Vec<DocumentRecord>> {
        if limit == 0 {
            return Err(DocumentError::search("limit must be a positive integer", query));
        }

        let needle = query.to_lowercase();
        let index = self.index.lock().await;
        let mut results = Vec::new();

        for record in index.documents.values() {
            if results.len() >= limit {
                break;
            }
            if !tags.is_empty() && !record.tags.iter().any(|tag| tags.contains(tag)) {
                continue;
            }

            let filename = record.file.filename.to_lowercase();
            let joined_tags = record.tags.join(" ").to_lowercase();
            if filename.contains(&needle) || joined_tags.contains(&needle) {
                results.push(record.clone());
            }
        }

        info!("Search for '{}' returned {} results", query, results.len());
        Ok(results)
    }

    /// Returns the stored record for an indexed path, or fresh filesystem
    /// metadata otherwise. Never modifies the index.
    pub async fn extract_metadata(&self, path: &str) -> Result<DocumentMetadata> {
        let doc_path = Path::new(path);
        if !doc_path.exists() {
            return Err(DocumentError::not_found(path));
        }

        let format_error = |e: std::io::Error| {
            error!("Failed to extract metadata from {}: {}", path, e);
            DocumentError::format(format!("Failed to extract metadata: {e}"), path)
        };

        let canonical = fs::canonicalize(doc_path).map_err(format_error)?;
        let id = canonical.to_string_lossy();
        if let Some(record) = self.index.lock().await.documents.get(id.as_ref()) {
            return Ok(DocumentMetadata::Indexed(record.clone()));
        }

        extract_file_metadata(&canonical)
            .map(DocumentMetadata::Unindexed)
            .map_err(format_error)
    }

    /// Drops tag associations whose record no longer carries the tag, then
    /// any tag left without documents. Returns how many associations went.
    pub async fn compact_tags(&self) -> Result<usize> {
        let mut index = self.index.lock().await;
        let IndexFile { documents, tags } = &mut *index;

        let mut removed = 0;
        tags.retain(|tag, ids| {
            let before = ids.len();
            ids.retain(|id| {
                documents
                    .get(id)
                    .is_some_and(|record| record.tags.contains(tag))
            });
            removed += before - ids.len();
            !ids.is_empty()
        });

        self.persist(&index)?;
        info!("Compacted tag index, removed {} stale associations", removed);
        Ok(removed)
    }

    pub async fn document_count(&self) -> usize {
        self.index.lock().await.documents.len()
    }

    pub async fn get(&self, id: &str) -> Option<DocumentRecord> {
        self.index.lock().await.documents.get(id).cloned()
    }

    /// Ids currently associated with `tag`, stale ones included.
    pub async fn tagged_ids(&self, tag: &str) -> Vec<String> {
        self.index
            .lock()
            .await
            .tags
            .get(tag)
            .cloned()
            .unwrap_or_default()
    }

    fn index_locked(&self, index: &mut IndexFile, path: &str, tags: Vec<String>) -> Result<String> {
        let doc_path = Path::new(path);
        if !doc_path.exists() {
            return Err(DocumentError::not_found(path));
        }

        let index_error = |e: std::io::Error| {
            error!("Failed to index document {}: {}", path, e);
            DocumentError::index(format!("Failed to index document: {e}"), Some(path.to_string()))
        };

        // Content is not indexed; reading it only checks the document is text.
        extract_text_from_file(doc_path).map_err(index_error)?;
        let canonical = fs::canonicalize(doc_path).map_err(index_error)?;
        let file = extract_file_metadata(&canonical).map_err(index_error)?;
        let id = file.path.clone();

        for tag in &tags {
            let ids = index.tags.entry(tag.clone()).or_default();
            if !ids.contains(&id) {
                ids.push(id.clone());
            }
        }
        index.documents.insert(
            id.clone(),
            DocumentRecord {
                id: id.clone(),
                file,
                tags,
                indexed_at: Some(now_timestamp()),
            },
        );

        self.persist(index)?;
        info!("Indexed document: {}", id);
        Ok(id)
    }

    /// Rewrites the whole index through a temporary sibling file.
    fn persist(&self, index: &IndexFile) -> Result<()> {
        let save_error = |e: String| {
            error!("Failed to save index: {}", e);
            DocumentError::index(format!("Failed to save index: {e}"), None)
        };

        let json = serde_json::to_string_pretty(index).map_err(|e| save_error(e.to_string()))?;
        let tmp = self.index_file.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| save_error(e.to_string()))?;
        fs::rename(&tmp, &self.index_file).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            save_error(e.to_string())
        })
    }
}

fn load_index(index_file: &Path) -> IndexFile {
    if !index_file.exists() {
        return IndexFile::default();
    }
    let parsed = fs::read_to_string(index_file)
        .map_err(|e| e.to_string())
        .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()));
    match parsed {
        Ok(index) => index,
        Err(e) => {
            warn!("Failed to load index {:?}, starting empty: {}", index_file, e);
            IndexFile::default()
        }
    }
}
