//! Locating and reading source map text for the CLI.
//!
//! A map is read directly from a `.map` file, or found through the
//! `sourceMappingURL` comment of the generated file it belongs to. The
//! comment may point at a sibling file or embed the map as a base64
//! `data:` URL.

use crate::{ResolverError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

const STDIN_PATH: &str = "-";
const DATA_URL_PREFIX: &str = "data:";
const URL_MARKERS: [&str; 2] = ["# sourceMappingURL=", "@ sourceMappingURL="];

/// Where the map text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOrigin {
    File(PathBuf),
    Inline { generated: PathBuf },
    Referenced { generated: PathBuf, map: PathBuf },
    Stdin,
}

impl std::fmt::Display for MapOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapOrigin::File(path) => write!(f, "{}", path.display()),
            MapOrigin::Inline { generated } => write!(f, "{} (inline)", generated.display()),
            MapOrigin::Referenced { map, .. } => write!(f, "{}", map.display()),
            MapOrigin::Stdin => write!(f, "<stdin>"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub origin: MapOrigin,
    pub text: String,
}

/// Read map text from a map file, a generated file, or `-` for stdin.
pub fn load_map_text(path: &Path) -> Result<LoadedMap> {
    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| ResolverError::FileError(format!("Failed to read stdin: {}", e)))?;
        return Ok(LoadedMap {
            origin: MapOrigin::Stdin,
            text,
        });
    }

    let content = read_file(path)?;
    if looks_like_map(path, &content) {
        return Ok(LoadedMap {
            origin: MapOrigin::File(path.to_path_buf()),
            text: content,
        });
    }

    let url = locate_source_mapping_url(&content).ok_or_else(|| {
        ResolverError::FileError(format!(
            "{:?} is not a source map and has no sourceMappingURL comment",
            path
        ))
    })?;

    if url.starts_with(DATA_URL_PREFIX) {
        return Ok(LoadedMap {
            origin: MapOrigin::Inline {
                generated: path.to_path_buf(),
            },
            text: decode_data_url(url)?,
        });
    }

    let map_path = path
        .parent()
        .map(|dir| dir.join(url))
        .unwrap_or_else(|| PathBuf::from(url));
    tracing::debug!(map = %map_path.display(), "Following sourceMappingURL");
    let text = read_file(&map_path)?;
    Ok(LoadedMap {
        origin: MapOrigin::Referenced {
            generated: path.to_path_buf(),
            map: map_path,
        },
        text,
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        ResolverError::FileError(format!("Failed to read {:?}: {}", path, e))
    })
}

/// Map files by extension, or any text whose first token opens a JSON object.
pub fn looks_like_map(path: &Path, content: &str) -> bool {
    if matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("map") | Some("json")
    ) {
        return true;
    }
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with('{') || trimmed.starts_with(")]}'")
}

/// The URL of the last `sourceMappingURL` comment in generated code.
pub fn locate_source_mapping_url(code: &str) -> Option<&str> {
    code.lines().rev().find_map(|line| {
        let line = line.trim();
        let body = line
            .strip_prefix("//")
            .or_else(|| line.strip_prefix("/*").map(|b| b.trim_end_matches("*/")))?;
        URL_MARKERS
            .iter()
            .find_map(|marker| body.strip_prefix(marker))
            .map(str::trim)
            .filter(|url| !url.is_empty())
    })
}

/// Decode a `data:application/json;base64,...` URL into map text.
pub fn decode_data_url(url: &str) -> Result<String> {
    let bad = |reason: &str| {
        ResolverError::FileError(format!("Unsupported inline source map: {}", reason))
    };

    let rest = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| bad("not a data URL"))?;
    let (header, payload) = rest.split_once(',').ok_or_else(|| bad("missing payload"))?;

    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default();
    if !media_type.is_empty() && media_type != "application/json" {
        return Err(bad(&format!("media type {:?}", media_type)));
    }
    if !params.any(|p| p == "base64") {
        return Err(bad("only base64 encoding is supported"));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| bad(&format!("invalid base64 payload: {}", e)))?;
    String::from_utf8(bytes).map_err(|_| bad("payload is not UTF-8"))
}
