//! Helpers for keeping directory layouts out of log output.
//!
//! Logs name documents and page images by file name only.

use std::path::Path;

/// Returns only the file name component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
