//! Cleanup of user-supplied path strings and output file names.

use std::path::Path;

/// Characters that cannot appear in output file names on common filesystems.
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Trim whitespace and surrounding quotes from a pasted path.
///
/// Returns `None` when nothing remains.
pub fn strip_path(raw: Option<&str>) -> Option<String> {
    let cleaned = raw?.trim().trim_matches('"').trim_matches('\'');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Leaf folder name of a directory path, ignoring trailing separators.
pub fn leaf_name(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

/// Make a directory name safe to embed in an output file name.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if INVALID_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    replaced.trim_matches([' ', '.']).to_string()
}
