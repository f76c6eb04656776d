use crate::record::FileMetadata;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Reads the whole file as UTF-8 text. Binary formats are not decoded.
pub fn extract_text_from_file(file_path: &Path) -> io::Result<String> {
    fs::read_to_string(file_path)
}

/// Stats `file_path` and describes it. `file_path` should already be absolute.
pub fn extract_file_metadata(file_path: &Path) -> io::Result<FileMetadata> {
    let stat = fs::metadata(file_path)?;
    let modified = stat.modified()?;
    // Not every filesystem records a birth time.
    let created = stat.created().unwrap_or(modified);

    Ok(FileMetadata {
        path: file_path.to_string_lossy().into_owned(),
        filename: file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        extension: extension_with_dot(file_path),
        size: stat.len(),
        created: format_timestamp(created),
        modified: format_timestamp(modified),
    })
}

/// Local wall-clock time in ISO-8601, microsecond precision.
pub fn now_timestamp() -> String {
    Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string()
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .naive_local()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

fn extension_with_dot(file_path: &Path) -> String {
    match file_path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => String::new(),
    }
}
