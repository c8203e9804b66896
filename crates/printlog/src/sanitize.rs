//! Helpers for keeping log output short and free of full spool paths.

use std::path::Path;

/// Maximum number of characters of a raw line quoted in a warning.
pub const EXCERPT_LEN: usize = 60;

/// Returns at most `EXCERPT_LEN` characters of `line`, with an ellipsis when
/// the line was cut. Truncation is char-based, never splitting a code point.
pub fn excerpt(line: &str) -> String {
    let mut chars = line.chars();
    let head: String = chars.by_ref().take(EXCERPT_LEN).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Returns only the filename component of a path for logging.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}
