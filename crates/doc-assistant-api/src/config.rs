use once_cell::sync::Lazy;
use std::env;

// --- Configuration using once_cell::sync::Lazy ---
pub static DOCUMENTS_DIR: Lazy<String> =
    Lazy::new(|| env::var("DOCUMENTS_DIR").unwrap_or_else(|_| "./documents".into()));
pub static INDEX_DIR: Lazy<String> =
    Lazy::new(|| env::var("INDEX_DIR").unwrap_or_else(|_| "./index".into()));
pub static API_BASE_URL: Lazy<String> =
    Lazy::new(|| env::var("API_BASE_URL").unwrap_or_else(|_| "127.0.0.1:3030".into()));
