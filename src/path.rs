//! Relative path normalization for tree entries
//!
//! Entry paths are slash-separated, never start with `/`, and directories
//! carry a single trailing `/`. Byte-wise ordering of such strings places a
//! directory immediately before all of its descendants.

use unicode_normalization::UnicodeNormalization;

/// Normalize a caller-supplied relative path
///
/// This function:
/// 1. Normalizes Unicode to NFC
/// 2. Converts `\` separators to `/`
/// 3. Drops empty and `.` segments (leading `/`, `./`, doubled slashes)
/// 4. Keeps a single trailing `/` when the input had one
pub fn normalize_relative_path(path: &str) -> String {
    let normalized: String = path.nfc().collect();
    let normalized = normalized.replace('\\', "/");
    let is_dir = normalized.ends_with('/');

    let mut result = normalized
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");

    if is_dir && !result.is_empty() {
        result.push('/');
    }
    result
}

/// Whether a relative path denotes a directory
pub fn is_directory_path(path: &str) -> bool {
    path.ends_with('/')
}

/// Ensure a directory path carries its trailing slash
pub fn as_directory_path(path: &str) -> String {
    let normalized = normalize_relative_path(path);
    if normalized.is_empty() || normalized.ends_with('/') {
        normalized
    } else {
        format!("{}/", normalized)
    }
}

/// Normalize a path and drop any directory marker
pub fn as_file_path(path: &str) -> String {
    normalize_relative_path(strip_trailing_slash(path))
}

/// Strip the trailing slash used to mark directories
pub fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Every ancestor directory of `path`, shallowest first, each with a trailing slash
///
/// `a/b/c.js` yields `a/`, `a/b/`; `a/b/` yields `a/`.
pub fn ancestor_directories(path: &str) -> Vec<String> {
    let trimmed = strip_trailing_slash(path);
    let mut ancestors = Vec::new();
    for (index, ch) in trimmed.char_indices() {
        if ch == '/' {
            ancestors.push(trimmed[..=index].to_string());
        }
    }
    ancestors
}
