//! Shared path helpers for traversals
//!
//! Listed paths are plain strings so that directories can carry a trailing
//! separator, which `PathBuf` would normalize away.

use std::path::{self, Path};

use glob::Pattern;

/// Append the platform separator unless `path` already ends with one.
pub fn with_trailing_separator(path: &str) -> String {
    if path.chars().next_back().is_some_and(path::is_separator) {
        path.to_string()
    } else {
        format!("{}{}", path, path::MAIN_SEPARATOR)
    }
}

/// Default base directory for denormalized paths: the parent of `root`,
/// with a trailing separator. A root without a parent uses `.`.
pub fn default_base_dir(root: &str) -> String {
    let parent = Path::new(root)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| ".".to_string());
    with_trailing_separator(&parent)
}

/// Strip `base_dir` from the front of `path`; paths outside it are unchanged.
pub fn denormalize<'a>(path: &'a str, base_dir: &str) -> &'a str {
    path.strip_prefix(base_dir).unwrap_or(path)
}

/// Path as emitted by a lister: full when normalizing, base-relative otherwise.
pub fn display_path(path: &str, normalize: bool, base_dir: &str) -> String {
    if normalize {
        path.to_string()
    } else {
        denormalize(path, base_dir).to_string()
    }
}

/// Last component of a path, ignoring any trailing separator.
pub fn entry_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(path::is_separator);
    trimmed
        .rsplit(path::is_separator)
        .next()
        .unwrap_or(trimmed)
}

/// Match a glob pattern against a name.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}

/// Check if a directory should be pruned based on its name and ignore patterns.
pub fn should_ignore_dir(path: &str, ignore_patterns: &[String]) -> bool {
    let name = entry_name(path);
    ignore_patterns
        .iter()
        .any(|pattern| name == pattern || glob_match(pattern, name))
}
