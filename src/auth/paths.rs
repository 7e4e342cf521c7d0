//! Exclusion-path matching.
//!
//! Decides whether a request path needs authentication. Patterns come in
//! two forms:
//!
//! - `"/api/v1/status"` or `"/api/v1/status/"`: exact match, where a single
//!   trailing `/` on either the pattern or the path is ignored
//! - `"/api/v1/stat*"`: prefix match on everything before the `*`
//!
//! With no patterns at all every path requires authentication.

/// Returns `true` when `path` is not covered by any pattern in `excluded`.
pub fn requires_auth<S: AsRef<str>>(path: Option<&str>, excluded: &[S]) -> bool {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return true;
    };

    !excluded
        .iter()
        .map(|pattern| pattern.as_ref().trim())
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| matches_pattern(path, pattern))
}

fn matches_pattern(path: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => {
            path == pattern
                || path.strip_suffix('/') == Some(pattern)
                || pattern.strip_suffix('/') == Some(path)
        }
    }
}
