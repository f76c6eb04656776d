pub mod content_extractor;
pub mod document_store;
pub mod error;
pub mod note;
pub mod record;
pub mod tools;

pub use document_store::DocumentStore;
pub use error::DocumentError;
pub use record::{DocumentMetadata, DocumentRecord, FileMetadata};
