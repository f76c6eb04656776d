//! Markdown note layout: filename derivation and the frontmatter header.

use std::fmt::Write;

/// Derives the note's filename from its title.
///
/// Lower-cases, turns spaces into hyphens and appends `.md`. Characters that
/// could leave the storage directory or are reserved on common filesystems
/// are percent-encoded, `%` included so distinct titles stay distinct.
pub fn note_filename(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + 3);
    for ch in title.to_lowercase().chars() {
        match ch {
            ' ' => name.push('-'),
            '%' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => percent_encode(&mut name, ch),
            c if c.is_control() => percent_encode(&mut name, c),
            c => name.push(c),
        }
    }
    if name.is_empty() {
        name.push_str("untitled");
    }
    // Leading dot would hide the note.
    if name.starts_with('.') {
        name.replace_range(0..1, "%2E");
    }
    name.push_str(".md");
    name
}

fn percent_encode(out: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    for byte in ch.encode_utf8(&mut buf).bytes() {
        let _ = write!(out, "%{byte:02X}");
    }
}

/// Renders the full note body: frontmatter block, blank line, raw content.
pub fn render_note(title: &str, created: &str, tags: &[String], content: &str) -> String {
    format!(
        "---\ntitle: {title}\ncreated: {created}\ntags: {}\n---\n\n{content}",
        tags.join(", ")
    )
}
