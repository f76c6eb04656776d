use thiserror::Error;

/// Failures raised by [`crate::document_store::DocumentStore`] operations.
///
/// The `Display` rendering is what callers of the tool boundary see, so the
/// offending path or query is appended the same way for every variant.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document not found (path: {path})")]
    NotFound { path: String },

    #[error("Format error: {message} (path: {path})")]
    Format { message: String, path: String },

    #[error("Indexing error: {message}{}", path_suffix(.path))]
    Index {
        message: String,
        path: Option<String>,
    },

    #[error("Search error: {message} (query: {query})")]
    Search { message: String, query: String },
}

fn path_suffix(path: &Option<String>) -> String {
    match path {
        Some(path) => format!(" (path: {path})"),
        None => String::new(),
    }
}

impl DocumentError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn format(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn index(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Index {
            message: message.into(),
            path,
        }
    }

    pub fn search(message: impl Into<String>, query: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
            query: query.into(),
        }
    }
}
