//! Canonical spelling of source paths.
//!
//! Bundlers write the same file in many ways (`webpack:///./src/a.js`,
//! `./src/a.js?5a3b`, `src\a.js`). Every source is reduced to one form
//! when the map is parsed, and lookups by name go through the same
//! function.

const WEBPACK_SCHEME: &str = "webpack://";
const FILE_SCHEME: &str = "file://";

/// Normalize a source path, prefixing `source_root` when the path is relative.
pub fn normalize_source_path(source: &str, source_root: Option<&str>) -> String {
    normalize(source, source_root, false)
}

/// Like [`normalize_source_path`], but keeps any `?query` or `#fragment`.
pub fn normalize_source_path_with_query(source: &str, source_root: Option<&str>) -> String {
    normalize(source, source_root, true)
}

fn normalize(source: &str, source_root: Option<&str>, keep_query: bool) -> String {
    let joined = match source_root {
        Some(root) if !root.is_empty() && !is_absolute_or_url(source) => {
            if root.ends_with('/') {
                format!("{}{}", root, source)
            } else {
                format!("{}/{}", root, source)
            }
        }
        _ => source.to_string(),
    };

    let joined = joined.replace('\\', "/");
    let (path, query) = split_query(&joined);
    let query = if keep_query { query } else { "" };

    let path = if let Some(rest) = path.strip_prefix(WEBPACK_SCHEME) {
        match rest.strip_prefix('/') {
            Some(local) => local,
            // webpack://<namespace>/<path>
            None => rest.split_once('/').map(|(_, local)| local).unwrap_or(rest),
        }
    } else if let Some(rest) = path.strip_prefix(FILE_SCHEME) {
        rest
    } else if has_scheme(path) {
        return format!("{}{}", path, query);
    } else {
        path
    };

    format!("{}{}", collapse_dots(path), query)
}

fn split_query(path: &str) -> (&str, &str) {
    match path.find(['?', '#']) {
        Some(pos) => path.split_at(pos),
        None => (path, ""),
    }
}

fn has_scheme(path: &str) -> bool {
    match path.find("://") {
        Some(pos) => path[..pos]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        None => false,
    }
}

fn is_absolute_or_url(path: &str) -> bool {
    path.starts_with('/') || has_scheme(path)
}

fn collapse_dots(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
