//! Lexical path normalization.
//!
//! Every path that takes part in a comparison (exclusion rules, crawl output,
//! fingerprint store keys) goes through [`normalize`] first, so that two
//! spellings of the same location compare byte-equal.
//!
//! # Rules
//!
//! 1. On Windows `\` is treated as a separator and rewritten to `/`. On
//!    other platforms it is an ordinary file name character.
//! 2. Repeated separators collapse and `.` segments are dropped.
//! 3. `..` removes the preceding normal segment. With nothing to remove it is
//!    kept for relative paths and dropped at the root of absolute ones.
//! 4. An empty result is `.` (relative) or `/` (absolute).
//!
//! The filesystem is never consulted and symbolic links are never resolved.
//!
//! ```rust
//! use source_sync_core::path::{normalize, normalize_with};
//!
//! assert_eq!(normalize("./src//lib/../main.rs"), "src/main.rs");
//! assert_eq!(normalize_with(r"proj\sub\c.py", true), "proj/sub/c.py");
//! assert_eq!(normalize_with(r"proj\sub\c.py", false), r"proj\sub\c.py");
//! ```

use std::path::Path;

/// Whether `\` separates path segments on this platform.
pub const BACKSLASH_IS_SEPARATOR: bool = cfg!(windows);

/// Normalize a raw path string with the platform's separator rules.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, BACKSLASH_IS_SEPARATOR)
}

/// Normalize a raw path string, treating `\` as a separator only when
/// `backslash_separates` is set.
pub fn normalize_with(raw: &str, backslash_separates: bool) -> String {
    let unified = if backslash_separates {
        raw.replace('\\', "/")
    } else {
        raw.to_string()
    };
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Normalize a [`Path`], converting non-UTF-8 components lossily.
///
/// A lossy result names a different file than `path`; use
/// [`try_normalize_path`] when the string will be used for I/O.
pub fn normalize_path(path: &Path) -> String {
    normalize(&path.to_string_lossy())
}

/// Normalize a [`Path`] only when it is valid UTF-8.
pub fn try_normalize_path(path: &Path) -> Option<String> {
    path.to_str().map(normalize)
}

/// Final segment of a normalized path.
pub fn file_name(normalized: &str) -> &str {
    normalized.rsplit('/').next().unwrap_or(normalized)
}

/// Extension of a bare file name: the suffix after the last dot, without the
/// dot. Names whose only dot is the leading one (`.bashrc`) have none.
pub fn extension(name: &str) -> Option<&str> {
    let stem_len = name.len() - name.trim_start_matches('.').len();
    let (_, rest) = name.split_at(stem_len);
    rest.rfind('.').map(|pos| &rest[pos + 1..])
}
